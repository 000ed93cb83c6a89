//! Shared test utilities for the patchsmith workspace.
//!
//! This crate provides:
//! - **arb**: Proptest strategies for chunk streams, descriptors, and file patches
//! - **patch_builder**: Fluent builders for constructing file patches by hand
//! - **fixtures**: Common test fixtures (sample patches and their expected output)
//! - **unified**: A small unified-diff reader used for round-trip checks
//!
//! # Example
//!
//! ```rust,ignore
//! use patchsmith_testkit::arb;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     fn chunks_cover_both_sides(chunks in arb::arb_chunk_stream()) {
//!         assert!(chunks.iter().all(|c| !c.lines.is_empty()));
//!     }
//! }
//! ```

pub mod arb;
pub mod fixtures;
pub mod patch_builder;
pub mod unified;

// Re-export commonly used items
pub use arb::{arb_chunk_stream, arb_context_lines, arb_file_change, arb_file_patch};
pub use fixtures::sample_patches;
pub use patch_builder::{FileBuilder, PatchBuilder};
pub use unified::{parse_unified, ParsedFile, ParsedHunk, ReadError};
