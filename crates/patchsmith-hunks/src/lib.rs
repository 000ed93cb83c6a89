//! Hunk generation.
//!
//! This crate turns an aligned chunk stream (equal / added / deleted runs) into
//! unified-diff hunks with bounded context.

mod generator;
mod hunk;

pub use generator::{generate_hunks, HunkGenerator};
pub use hunk::{Hunk, HunkOp};
