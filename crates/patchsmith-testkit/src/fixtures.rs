//! Common test fixtures for patchsmith.
//!
//! Each fixture covers one header shape from the unified-diff format: content
//! edits, new and deleted files, binary files, renames, and mode changes.

use patchsmith_types::{FileMode, FilePatch, Patch};

use crate::patch_builder::{FileBuilder, PatchBuilder};

/// Collection of sample file patches for testing.
pub mod sample_patches {
    use super::*;

    /// `a b c d` -> `a B c d`: one replaced line in the middle of a file.
    pub fn single_line_change() -> FilePatch {
        FileBuilder::modified("letters.txt")
            .equal(&["a"])
            .delete(&["b"])
            .add(&["B"])
            .equal(&["c", "d"])
            .build()
    }

    /// A two-line file created without a trailing newline.
    pub fn new_file() -> FilePatch {
        FileBuilder::added("hello.txt")
            .add(&["hello", "world"])
            .no_newline()
            .build()
    }

    /// A removed executable script.
    pub fn deleted_file() -> FilePatch {
        FileBuilder::deleted("run.sh")
            .modes(FileMode::EXECUTABLE, FileMode::EXECUTABLE)
            .delete(&["#!/bin/sh", "echo hi"])
            .build()
    }

    /// An image whose bytes changed.
    pub fn binary_file() -> FilePatch {
        FileBuilder::modified("logo.png").binary().build()
    }

    /// A file moved to a new path with one line edited.
    pub fn rename_with_edit() -> FilePatch {
        FileBuilder::modified("src/new_name.rs")
            .renamed_from("src/old_name.rs")
            .equal(&["fn main() {"])
            .delete(&["    old();"])
            .add(&["    new();"])
            .equal(&["}"])
            .build()
    }

    /// A file made executable without touching its content.
    pub fn mode_change_only() -> FilePatch {
        FileBuilder::modified("build.sh")
            .modes(FileMode::REGULAR, FileMode::EXECUTABLE)
            .same_content()
            .equal(&["#!/bin/sh"])
            .build()
    }

    /// A file made executable while its content changed too.
    pub fn mode_and_content_change() -> FilePatch {
        FileBuilder::modified("build.sh")
            .modes(FileMode::REGULAR, FileMode::EXECUTABLE)
            .delete(&["echo old"])
            .add(&["echo new"])
            .build()
    }

    /// Text whose lines need escaping in markup.
    pub fn html_sensitive() -> FilePatch {
        FileBuilder::modified("index.html")
            .delete(&["<p class=\"a\">Tom & Jerry's</p>"])
            .add(&["<p class=\"b\">Tom &amp; Jerry</p>"])
            .build()
    }

    /// A commit touching two files, with a message.
    pub fn two_file_commit() -> Patch {
        PatchBuilder::new()
            .message("Rename greeting")
            .file(
                FileBuilder::modified("a.txt")
                    .delete(&["hi"])
                    .add(&["hello"]),
            )
            .file(FileBuilder::added("b.txt").add(&["new"]))
            .build()
    }
}
