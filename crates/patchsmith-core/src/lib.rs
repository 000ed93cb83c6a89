//! Core engine: header formatting + hunk rendering for unified diffs.
//!
//! [`UnifiedEncoder`] drives the pipeline for each file patch: the header is
//! derived from the file descriptors, hunks come from `patchsmith-hunks`, and
//! both are serialized as plain unified-diff text or as escaped markup.

mod encoder;
mod escape;
mod header;
mod render;

pub use encoder::{render_changes, EncodeError, PatchSource, UnifiedEncoder, CHANGE_SEPARATOR};
pub use escape::escape_html;
pub use header::format_header;
pub use render::{render_file_patch, render_hunk, render_hunk_header};
