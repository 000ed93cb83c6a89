use std::error::Error;
use std::io::Write;

use patchsmith_types::{FilePatch, OutputFormat, Patch, DEFAULT_CONTEXT_LINES};
use tracing::debug;

use crate::escape::escape_html;
use crate::render::render_file_patch;

/// Joins whole patches rendered by [`render_changes`].
pub const CHANGE_SEPARATOR: &str = "\n\n\n\n";

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("patch source unavailable")]
    Source(#[source] Box<dyn Error + Send + Sync>),

    #[error("write failed for {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("write failed for patch message")]
    WriteMessage(#[source] std::io::Error),
}

/// Supplies the file patches of one change set.
///
/// Implemented by object-store adapters that materialize chunks lazily; a
/// failure there surfaces as [`EncodeError::Source`].
pub trait PatchSource {
    fn message(&self) -> Option<&str>;

    fn file_patches(&self) -> Result<Vec<FilePatch>, Box<dyn Error + Send + Sync>>;
}

impl PatchSource for Patch {
    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn file_patches(&self) -> Result<Vec<FilePatch>, Box<dyn Error + Send + Sync>> {
        Ok(self.files.clone())
    }
}

/// Encodes patches as unified diffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnifiedEncoder {
    context_lines: usize,
    format: OutputFormat,
}

impl Default for UnifiedEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_LINES as usize)
    }
}

impl UnifiedEncoder {
    /// Plain-text encoder with the given context window.
    pub fn new(context_lines: usize) -> Self {
        Self {
            context_lines,
            format: OutputFormat::Plain,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Render a single file patch.
    pub fn render_file(&self, file: &FilePatch) -> String {
        let (text, hunks) = render_file_patch(file, self.context_lines, self.format);
        debug!(
            path = file.change.display_path(),
            binary = file.binary,
            hunks,
            "rendered file patch"
        );
        text
    }

    /// Render a whole patch into a string.
    pub fn render(&self, patch: &Patch) -> String {
        let mut out = self.render_message(patch.message.as_deref());
        for (i, file) in patch.files.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&self.render_file(file));
        }
        out
    }

    /// Encode everything `source` supplies into `w`.
    ///
    /// Each file is rendered completely before it is written. On a write
    /// error nothing further is written; rerun from the source to retry.
    pub fn encode<S, W>(&self, source: &S, w: &mut W) -> Result<(), EncodeError>
    where
        S: PatchSource + ?Sized,
        W: Write + ?Sized,
    {
        let files = source.file_patches().map_err(EncodeError::Source)?;

        let message = self.render_message(source.message());
        if !message.is_empty() {
            w.write_all(message.as_bytes())
                .map_err(EncodeError::WriteMessage)?;
        }

        for (i, file) in files.iter().enumerate() {
            let mut text = String::new();
            if i > 0 {
                text.push('\n');
            }
            text.push_str(&self.render_file(file));
            w.write_all(text.as_bytes()).map_err(|source| EncodeError::Write {
                path: file.change.display_path().to_string(),
                source,
            })?;
        }

        Ok(())
    }

    fn render_message(&self, message: Option<&str>) -> String {
        let Some(message) = message.filter(|m| !m.is_empty()) else {
            return String::new();
        };
        let mut out = match self.format {
            OutputFormat::Plain => message.to_string(),
            OutputFormat::Markup => escape_html(message).into_owned(),
        };
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

/// Render several patches (for example, one per changed path of a commit)
/// and join them with [`CHANGE_SEPARATOR`].
pub fn render_changes(encoder: &UnifiedEncoder, patches: &[Patch]) -> String {
    patches
        .iter()
        .map(|p| encoder.render(p))
        .collect::<Vec<_>>()
        .join(CHANGE_SEPARATOR)
}
