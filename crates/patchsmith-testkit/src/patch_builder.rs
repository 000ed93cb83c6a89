//! Fluent builders for constructing file patches in tests.
//!
//! # Example
//!
//! ```rust
//! use patchsmith_testkit::patch_builder::PatchBuilder;
//!
//! let patch = PatchBuilder::new()
//!     .message("Tweak greeting")
//!     .file(
//!         patchsmith_testkit::FileBuilder::modified("src/lib.rs")
//!             .equal(&["fn existing() {}"])
//!             .add(&["fn new_function() {}"]),
//!     )
//!     .build();
//!
//! assert_eq!(patch.files.len(), 1);
//! ```

use patchsmith_types::{
    Chunk, FileChange, FileDescriptor, FileMode, FilePatch, Line, ObjectId, Operation, Patch,
};

/// Hash used for the source side of built files.
pub const FROM_HASH: &str = "1111111111111111111111111111111111111111";

/// Hash used for the destination side of built files.
pub const TO_HASH: &str = "2222222222222222222222222222222222222222";

/// A builder for a [`Patch`].
#[derive(Debug, Clone, Default)]
pub struct PatchBuilder {
    message: Option<String>,
    files: Vec<FilePatch>,
}

impl PatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text message rendered before the first file.
    pub fn message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn file(mut self, file: FileBuilder) -> Self {
        self.files.push(file.build());
        self
    }

    pub fn build(self) -> Patch {
        Patch {
            message: self.message,
            files: self.files,
        }
    }
}

/// A builder for a single [`FilePatch`].
#[derive(Debug, Clone)]
pub struct FileBuilder {
    from: Option<FileDescriptor>,
    to: Option<FileDescriptor>,
    binary: bool,
    chunks: Vec<Chunk>,
}

impl FileBuilder {
    /// Content change of a regular file at `path`.
    pub fn modified(path: &str) -> Self {
        Self {
            from: Some(descriptor(path, FROM_HASH)),
            to: Some(descriptor(path, TO_HASH)),
            binary: false,
            chunks: Vec::new(),
        }
    }

    /// A file that only exists on the destination side.
    pub fn added(path: &str) -> Self {
        Self {
            from: None,
            to: Some(descriptor(path, TO_HASH)),
            binary: false,
            chunks: Vec::new(),
        }
    }

    /// A file that only exists on the source side.
    pub fn deleted(path: &str) -> Self {
        Self {
            from: Some(descriptor(path, FROM_HASH)),
            to: None,
            binary: false,
            chunks: Vec::new(),
        }
    }

    /// Move the source side to `old_path`.
    pub fn renamed_from(mut self, old_path: &str) -> Self {
        if let Some(from) = self.from.as_mut() {
            from.path = old_path.to_string();
        }
        self
    }

    pub fn modes(mut self, from: FileMode, to: FileMode) -> Self {
        if let Some(d) = self.from.as_mut() {
            d.mode = from;
        }
        if let Some(d) = self.to.as_mut() {
            d.mode = to;
        }
        self
    }

    /// Give both sides the same hash (metadata-only change).
    pub fn same_content(mut self) -> Self {
        if let Some(d) = self.to.as_mut() {
            d.hash = ObjectId::new(FROM_HASH);
        }
        self
    }

    pub fn binary(mut self) -> Self {
        self.binary = true;
        self
    }

    pub fn equal(self, lines: &[&str]) -> Self {
        self.chunk(Operation::Equal, lines)
    }

    pub fn add(self, lines: &[&str]) -> Self {
        self.chunk(Operation::Add, lines)
    }

    pub fn delete(self, lines: &[&str]) -> Self {
        self.chunk(Operation::Delete, lines)
    }

    /// Mark the most recently added line as lacking a trailing newline.
    pub fn no_newline(mut self) -> Self {
        if let Some(line) = self.chunks.last_mut().and_then(|c| c.lines.last_mut()) {
            line.newline = false;
        }
        self
    }

    fn chunk(mut self, op: Operation, lines: &[&str]) -> Self {
        self.chunks.push(Chunk::new(
            op,
            lines.iter().map(|l| Line::new(*l)).collect(),
        ));
        self
    }

    /// # Panics
    ///
    /// Panics if both sides were removed, which the constructors never do.
    pub fn build(self) -> FilePatch {
        let change = FileChange::from_sides(self.from, self.to)
            .expect("builder always keeps at least one side");
        FilePatch {
            change,
            binary: self.binary,
            chunks: self.chunks,
        }
    }
}

fn descriptor(path: &str, hash: &str) -> FileDescriptor {
    FileDescriptor::new(path, FileMode::REGULAR, ObjectId::new(hash))
}
