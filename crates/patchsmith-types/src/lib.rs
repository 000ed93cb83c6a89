//! Data types (chunks, file patches, config) for patchsmith.
//!
//! This crate is intentionally "dumb": pure DTOs with serde + schemars, plus
//! the few constructors that keep them well formed.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Unchanged lines shown around a change when nothing else is configured.
pub const DEFAULT_CONTEXT_LINES: u32 = 3;

/// Marker emitted after a line that lacks a trailing newline.
pub const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("file patch has neither a source nor a destination file")]
    NoSides,

    #[error("invalid file mode {0:?}: expected octal digits")]
    InvalidMode(String),
}

// ── Lines and chunks ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Equal,
    Add,
    Delete,
}

impl Operation {
    /// One-character line prefix used in unified diffs.
    pub fn prefix(self) -> char {
        match self {
            Operation::Equal => ' ',
            Operation::Add => '+',
            Operation::Delete => '-',
        }
    }

    /// CSS class used by the markup renderer.
    pub fn class(self) -> &'static str {
        match self {
            Operation::Equal => "diff-equal",
            Operation::Add => "diff-add",
            Operation::Delete => "diff-delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Line {
    /// Line content without its terminator.
    pub text: String,

    /// Whether the line ended with `\n`. Only a file's last line may not.
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub newline: bool,
}

fn default_true() -> bool {
    true
}

fn is_true(b: &bool) -> bool {
    *b
}

impl Line {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            newline: true,
        }
    }

    pub fn without_newline(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            newline: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Chunk {
    pub op: Operation,
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl Chunk {
    pub fn new(op: Operation, lines: Vec<Line>) -> Self {
        Self { op, lines }
    }

    /// Build a chunk from raw content, splitting after every `\n`.
    ///
    /// A trailing piece without `\n` becomes a line with `newline == false`;
    /// empty content yields an empty chunk.
    pub fn from_text(op: Operation, text: &str) -> Self {
        Self {
            op,
            lines: split_lines(text),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split raw file content into [`Line`]s.
pub fn split_lines(text: &str) -> Vec<Line> {
    let mut out = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find('\n') {
            Some(i) => {
                out.push(Line::new(&rest[..i]));
                rest = &rest[i + 1..];
            }
            None => {
                out.push(Line::without_newline(rest));
                break;
            }
        }
    }
    out
}

// ── File metadata ─────────────────────────────────────────────

/// Git file mode bits. Serialized as an octal string such as `"100644"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileMode(pub u32);

impl FileMode {
    pub const REGULAR: FileMode = FileMode(0o100644);
    pub const EXECUTABLE: FileMode = FileMode(0o100755);
    pub const SYMLINK: FileMode = FileMode(0o120000);

    pub fn parse_octal(s: &str) -> Result<Self, TypesError> {
        u32::from_str_radix(s, 8)
            .map(FileMode)
            .map_err(|_| TypesError::InvalidMode(s.to_string()))
    }
}

impl Default for FileMode {
    fn default() -> Self {
        FileMode::REGULAR
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:o}", self.0)
    }
}

impl TryFrom<String> for FileMode {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        FileMode::parse_octal(&s)
    }
}

impl From<FileMode> for String {
    fn from(mode: FileMode) -> Self {
        mode.to_string()
    }
}

/// Content-addressed object hash, as hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    /// Sentinel for "no object" on the missing side of an add or delete.
    pub const ZERO: &'static str = "0000000000000000000000000000000000000000";

    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileDescriptor {
    pub path: String,
    #[serde(default)]
    #[schemars(with = "String")]
    pub mode: FileMode,
    pub hash: ObjectId,
}

impl FileDescriptor {
    pub fn new(path: impl Into<String>, mode: FileMode, hash: ObjectId) -> Self {
        Self {
            path: path.into(),
            mode,
            hash,
        }
    }
}

/// Which sides of a file pair exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileChange {
    Added { to: FileDescriptor },
    Deleted { from: FileDescriptor },
    Modified { from: FileDescriptor, to: FileDescriptor },
}

impl FileChange {
    /// Build from optional sides as handed over by an object layer.
    pub fn from_sides(
        from: Option<FileDescriptor>,
        to: Option<FileDescriptor>,
    ) -> Result<Self, TypesError> {
        match (from, to) {
            (Some(from), Some(to)) => Ok(FileChange::Modified { from, to }),
            (None, Some(to)) => Ok(FileChange::Added { to }),
            (Some(from), None) => Ok(FileChange::Deleted { from }),
            (None, None) => Err(TypesError::NoSides),
        }
    }

    pub fn from(&self) -> Option<&FileDescriptor> {
        match self {
            FileChange::Added { .. } => None,
            FileChange::Deleted { from } | FileChange::Modified { from, .. } => Some(from),
        }
    }

    pub fn to(&self) -> Option<&FileDescriptor> {
        match self {
            FileChange::Deleted { .. } => None,
            FileChange::Added { to } | FileChange::Modified { to, .. } => Some(to),
        }
    }

    /// The path shown for this change (destination path when it exists).
    pub fn display_path(&self) -> &str {
        match self {
            FileChange::Added { to } | FileChange::Modified { to, .. } => &to.path,
            FileChange::Deleted { from } => &from.path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FilePatch {
    pub change: FileChange,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub binary: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chunks: Vec<Chunk>,
}

impl FilePatch {
    pub fn new(change: FileChange, chunks: Vec<Chunk>) -> Self {
        Self {
            change,
            binary: false,
            chunks,
        }
    }

    pub fn binary(change: FileChange) -> Self {
        Self {
            change,
            binary: true,
            chunks: Vec::new(),
        }
    }
}

/// A set of file patches, typically one commit, with an optional message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Patch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default)]
    pub files: Vec<FilePatch>,
}

// ── Output + configuration ────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Plain unified-diff text, consumable by patch tools.
    #[default]
    Plain,
    /// Escaped HTML with one `<span>` per diff line.
    Markup,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Markup => "markup",
        }
    }
}

/// The on-disk configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ConfigFile {
    /// Include other config files. Paths are relative to this config file's directory.
    /// Later files override earlier ones; the including file wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,

    #[serde(default)]
    pub defaults: Defaults,
}

/// Config-level defaults. A field left out of the file stays `None`, so an
/// including file can tell "unset" apart from a value equal to the built-in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_lines: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
}

impl Defaults {
    /// Values used when neither a flag nor a config file sets them.
    pub fn built_in() -> Self {
        Self {
            context_lines: Some(DEFAULT_CONTEXT_LINES),
            format: Some(OutputFormat::Plain),
        }
    }

    /// Overlay `other` on top of `self`: fields set in `other` win.
    pub fn merged_with(self, other: Defaults) -> Defaults {
        Defaults {
            context_lines: other.context_lines.or(self.context_lines),
            format: other.format.or(self.format),
        }
    }
}
