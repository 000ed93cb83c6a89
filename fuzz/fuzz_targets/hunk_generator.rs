//! Fuzz target for hunk generation.
//!
//! Arbitrary chunk streams are fed through `generate_hunks` and the result is
//! checked for count consistency, ordering, and bounded context.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use patchsmith_hunks::generate_hunks;
use patchsmith_types::{Chunk, Line, Operation};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    context_lines: u8,
    chunks: Vec<FuzzChunk>,
}

#[derive(Arbitrary, Debug)]
struct FuzzChunk {
    /// 0 = equal, 1 = add, anything else = delete.
    op: u8,
    lines: Vec<String>,
}

impl FuzzChunk {
    fn to_chunk(&self) -> Chunk {
        let op = match self.op % 3 {
            0 => Operation::Equal,
            1 => Operation::Add,
            _ => Operation::Delete,
        };
        Chunk::new(op, self.lines.iter().map(|l| Line::new(l.as_str())).collect())
    }
}

fuzz_target!(|input: FuzzInput| {
    let context = usize::from(input.context_lines % 16);
    let chunks: Vec<Chunk> = input.chunks.iter().map(FuzzChunk::to_chunk).collect();
    let hunks = generate_hunks(&chunks, context);

    let mut last_from_end = 0;
    for hunk in &hunks {
        let from = hunk.side(Operation::Delete).count() as u32;
        let to = hunk.side(Operation::Add).count() as u32;
        assert_eq!(hunk.from_count, from);
        assert_eq!(hunk.to_count, to);
        assert!(hunk.ops.iter().any(|o| o.op != Operation::Equal));

        let leading = hunk
            .ops
            .iter()
            .take_while(|o| o.op == Operation::Equal)
            .count();
        let trailing = hunk
            .ops
            .iter()
            .rev()
            .take_while(|o| o.op == Operation::Equal)
            .count();
        assert!(leading <= context && trailing <= context);

        assert!(hunk.from_start >= last_from_end);
        last_from_end = hunk.from_start + hunk.from_count;
    }
});
