//! Proptest strategies for generating valid inputs.
//!
//! Strategies are constructive: every generated chunk stream alternates
//! unchanged runs with change runs, the way an alignment algorithm emits them,
//! so no filtering is needed.
//!
//! # Bounds
//!
//! To keep tests fast, the following bounds are enforced:
//! - Max segments per stream: 12
//! - Max lines per chunk: 8
//! - Max context lines: 6

use patchsmith_types::{
    Chunk, FileChange, FileDescriptor, FileMode, FilePatch, Line, ObjectId, Operation,
};
use proptest::prelude::*;

// =============================================================================
// Constants for bounding generated data
// =============================================================================

/// Maximum number of equal/change segments in a generated stream
pub const MAX_SEGMENTS: usize = 12;

/// Maximum number of lines in a single chunk
pub const MAX_LINES_PER_CHUNK: usize = 8;

/// Maximum context window used by property tests
pub const MAX_CONTEXT_LINES: usize = 6;

// =============================================================================
// Chunk streams
// =============================================================================

/// Strategy for a context window size.
pub fn arb_context_lines() -> impl Strategy<Value = usize> {
    0..=MAX_CONTEXT_LINES
}

/// Strategy for generating mode values seen in git trees.
pub fn arb_file_mode() -> impl Strategy<Value = FileMode> {
    prop_oneof![
        Just(FileMode::REGULAR),
        Just(FileMode::EXECUTABLE),
        Just(FileMode::SYMLINK),
    ]
}

/// Strategy for generating 40-char hex object ids.
pub fn arb_object_id() -> impl Strategy<Value = ObjectId> {
    prop::string::string_regex("[0-9a-f]{40}")
        .expect("valid regex")
        .prop_map(ObjectId::new)
}

/// Strategy for relative file paths.
pub fn arb_file_path() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::string::string_regex("[a-z][a-z0-9_]{0,8}").expect("valid regex"),
        1..4,
    )
    .prop_map(|parts| parts.join("/"))
}

/// Strategy for line text. May contain characters that need escaping in markup.
pub fn arb_line_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 <>&\"'_(){};]{0,40}").expect("valid regex")
}

#[derive(Debug, Clone)]
enum Segment {
    Equal(usize),
    Change { deleted: usize, added: usize },
}

fn arb_segment_kinds() -> impl Strategy<Value = (bool, Vec<(usize, usize)>)> {
    (
        any::<bool>(),
        prop::collection::vec(
            (0..=MAX_LINES_PER_CHUNK, 0..=MAX_LINES_PER_CHUNK),
            1..=MAX_SEGMENTS,
        ),
    )
}

fn to_segments(starts_equal: bool, sizes: Vec<(usize, usize)>) -> Vec<Segment> {
    sizes
        .into_iter()
        .enumerate()
        .map(|(i, (a, b))| {
            let equal = (i % 2 == 0) == starts_equal;
            if equal {
                Segment::Equal(a.max(1))
            } else if a + b == 0 {
                Segment::Change {
                    deleted: 1,
                    added: 0,
                }
            } else {
                Segment::Change {
                    deleted: a,
                    added: b,
                }
            }
        })
        .collect()
}

fn lines(prefix: &str, start: usize, n: usize) -> Vec<Line> {
    (start..start + n)
        .map(|i| Line::new(format!("{prefix}{i}")))
        .collect()
}

/// Strategy for an aligned chunk stream.
///
/// Equal runs and change runs alternate; a change run is a Delete chunk
/// followed by an Add chunk, either of which may be absent. Line texts are
/// unique per side so hunk contents can be traced back to the input.
pub fn arb_chunk_stream() -> impl Strategy<Value = Vec<Chunk>> {
    (arb_segment_kinds(), any::<bool>()).prop_map(|((starts_equal, sizes), unterminated)| {
        let mut chunks = Vec::new();
        let mut n = 0usize;
        for seg in to_segments(starts_equal, sizes) {
            match seg {
                Segment::Equal(k) => {
                    chunks.push(Chunk::new(Operation::Equal, lines("same ", n, k)));
                    n += k;
                }
                Segment::Change { deleted, added } => {
                    if deleted > 0 {
                        chunks.push(Chunk::new(Operation::Delete, lines("old ", n, deleted)));
                    }
                    if added > 0 {
                        chunks.push(Chunk::new(Operation::Add, lines("new ", n, added)));
                    }
                    n += deleted.max(added);
                }
            }
        }
        if unterminated {
            if let Some(line) = chunks.last_mut().and_then(|c| c.lines.last_mut()) {
                line.newline = false;
            }
        }
        chunks
    })
}

/// Count lines on the (old, new) sides of a chunk stream.
pub fn side_lengths(chunks: &[Chunk]) -> (usize, usize) {
    chunks.iter().fold((0, 0), |(from, to), c| match c.op {
        Operation::Equal => (from + c.len(), to + c.len()),
        Operation::Delete => (from + c.len(), to),
        Operation::Add => (from, to + c.len()),
    })
}

// =============================================================================
// Files
// =============================================================================

/// Strategy for a file descriptor.
pub fn arb_file_descriptor() -> impl Strategy<Value = FileDescriptor> {
    (arb_file_path(), arb_file_mode(), arb_object_id())
        .prop_map(|(path, mode, hash)| FileDescriptor::new(path, mode, hash))
}

/// Strategy for any of the three file change shapes.
pub fn arb_file_change() -> impl Strategy<Value = FileChange> {
    prop_oneof![
        arb_file_descriptor().prop_map(|to| FileChange::Added { to }),
        arb_file_descriptor().prop_map(|from| FileChange::Deleted { from }),
        (arb_file_descriptor(), arb_file_descriptor(), any::<bool>()).prop_map(
            |(from, mut to, same_path)| {
                if same_path {
                    to.path = from.path.clone();
                }
                FileChange::Modified { from, to }
            }
        ),
    ]
}

/// Strategy for a text file patch whose chunks agree with its change kind.
pub fn arb_file_patch() -> impl Strategy<Value = FilePatch> {
    (arb_file_change(), arb_chunk_stream()).prop_map(|(change, chunks)| {
        let chunks = match &change {
            FileChange::Added { .. } => only(chunks, Operation::Add),
            FileChange::Deleted { .. } => only(chunks, Operation::Delete),
            FileChange::Modified { .. } => chunks,
        };
        FilePatch::new(change, chunks)
    })
}

/// Collapse a stream into one chunk of `op`, as a pure add or delete has.
fn only(chunks: Vec<Chunk>, op: Operation) -> Vec<Chunk> {
    let lines: Vec<Line> = chunks.into_iter().flat_map(|c| c.lines).collect();
    if lines.is_empty() {
        Vec::new()
    } else {
        vec![Chunk::new(op, lines)]
    }
}
