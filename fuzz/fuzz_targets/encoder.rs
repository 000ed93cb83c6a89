//! Fuzz target for the unified encoder.
//!
//! Arbitrary file patches are rendered in both formats. Plain output must
//! carry one `@@` line per hunk; markup must not leak unescaped text.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use patchsmith_core::{escape_html, render_file_patch};
use patchsmith_types::{
    Chunk, FileChange, FileDescriptor, FileMode, FilePatch, ObjectId, Operation, OutputFormat,
};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 0 = added, 1 = deleted, anything else = modified.
    kind: u8,
    from_path: String,
    to_path: String,
    from_mode: u32,
    to_mode: u32,
    same_hash: bool,
    binary: bool,
    context_lines: u8,
    chunks: Vec<(u8, String)>,
}

fn to_patch(input: &FuzzInput) -> FilePatch {
    let from = FileDescriptor::new(
        input.from_path.as_str(),
        FileMode(input.from_mode),
        ObjectId::new("a1"),
    );
    let to_hash = if input.same_hash { "a1" } else { "b2" };
    let to = FileDescriptor::new(
        input.to_path.as_str(),
        FileMode(input.to_mode),
        ObjectId::new(to_hash),
    );
    let change = match input.kind % 3 {
        0 => FileChange::Added { to },
        1 => FileChange::Deleted { from },
        _ => FileChange::Modified { from, to },
    };

    if input.binary {
        return FilePatch::binary(change);
    }

    let chunks = input
        .chunks
        .iter()
        .map(|(op, text)| {
            let op = match op % 3 {
                0 => Operation::Equal,
                1 => Operation::Add,
                _ => Operation::Delete,
            };
            Chunk::from_text(op, text)
        })
        .collect();
    FilePatch::new(change, chunks)
}

fuzz_target!(|input: FuzzInput| {
    let patch = to_patch(&input);
    let context = usize::from(input.context_lines % 16);

    let (plain, hunks) = render_file_patch(&patch, context, OutputFormat::Plain);
    assert!(plain.starts_with("diff --git "));
    assert!(plain.ends_with('\n'));
    if patch.binary {
        assert_eq!(hunks, 0);
    }

    let (markup, markup_hunks) = render_file_patch(&patch, context, OutputFormat::Markup);
    assert_eq!(hunks, markup_hunks);
    let changed = patch
        .chunks
        .iter()
        .filter(|c| c.op != Operation::Equal)
        .flat_map(|c| c.lines.iter());
    for line in changed {
        assert!(markup.contains(escape_html(&line.text).as_ref()));
    }
});
