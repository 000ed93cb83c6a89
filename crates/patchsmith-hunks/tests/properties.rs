//! Property-based tests for patchsmith-hunks.
//!
//! These tests verify the hunk bookkeeping invariants: per-hunk line counts,
//! ordering, context bounds, and that applying the hunks to the old side
//! reproduces the new side.

use patchsmith_hunks::{generate_hunks, Hunk};
use patchsmith_testkit::arb::{arb_chunk_stream, arb_context_lines, side_lengths};
use patchsmith_types::{Chunk, Line, Operation};
use proptest::prelude::*;

fn side(chunks: &[Chunk], other: Operation) -> Vec<Line> {
    chunks
        .iter()
        .filter(|c| c.op == Operation::Equal || c.op == other)
        .flat_map(|c| c.lines.iter().cloned())
        .collect()
}

/// 0-based index of the first line a hunk covers on one side.
fn first_index(start: u32, count: u32) -> usize {
    if count == 0 {
        start as usize
    } else {
        start as usize - 1
    }
}

/// Apply hunks to the old side, checking every context and deleted line.
fn apply(old: &[Line], hunks: &[Hunk]) -> Result<Vec<Line>, String> {
    let mut out = Vec::new();
    let mut pos = 0usize;

    for h in hunks {
        let begin = first_index(h.from_start, h.from_count);
        if begin < pos || begin > old.len() {
            return Err(format!("hunk at -{} goes backwards", h.from_start));
        }
        out.extend_from_slice(&old[pos..begin]);

        if out.len() != first_index(h.to_start, h.to_count) {
            return Err(format!(
                "hunk +{} does not match new-side position {}",
                h.to_start,
                out.len() + 1
            ));
        }

        pos = begin;
        for op in &h.ops {
            match op.op {
                Operation::Equal | Operation::Delete => {
                    if old.get(pos) != Some(&op.line) {
                        return Err(format!("mismatch at old line {}", pos + 1));
                    }
                    pos += 1;
                    if op.op == Operation::Equal {
                        out.push(op.line.clone());
                    }
                }
                Operation::Add => out.push(op.line.clone()),
            }
        }
    }

    out.extend_from_slice(&old[pos..]);
    Ok(out)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn counts_match_ops(chunks in arb_chunk_stream(), ctx in arb_context_lines()) {
        for h in generate_hunks(&chunks, ctx) {
            let from = h.ops.iter().filter(|o| o.op != Operation::Add).count() as u32;
            let to = h.ops.iter().filter(|o| o.op != Operation::Delete).count() as u32;
            prop_assert_eq!(h.from_count, from);
            prop_assert_eq!(h.to_count, to);
        }
    }

    #[test]
    fn hunks_are_ordered_and_disjoint(chunks in arb_chunk_stream(), ctx in arb_context_lines()) {
        let hunks = generate_hunks(&chunks, ctx);
        for pair in hunks.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.from_start < b.from_start);
            prop_assert!(a.from_start + a.from_count <= b.from_start);
            prop_assert!(a.to_start + a.to_count <= b.to_start);
        }
    }

    #[test]
    fn every_hunk_has_a_change(chunks in arb_chunk_stream(), ctx in arb_context_lines()) {
        for h in generate_hunks(&chunks, ctx) {
            prop_assert!(h.ops.iter().any(|o| o.op != Operation::Equal));
        }
    }

    #[test]
    fn context_is_bounded(chunks in arb_chunk_stream(), ctx in arb_context_lines()) {
        for h in generate_hunks(&chunks, ctx) {
            let leading = h.ops.iter().take_while(|o| o.op == Operation::Equal).count();
            let trailing = h.ops.iter().rev().take_while(|o| o.op == Operation::Equal).count();
            prop_assert!(leading <= ctx);
            prop_assert!(trailing <= ctx);

            // Interior unchanged runs never exceed the merge threshold.
            let mut run = 0usize;
            for o in &h.ops {
                if o.op == Operation::Equal {
                    run += 1;
                    prop_assert!(run <= ctx * 2);
                } else {
                    run = 0;
                }
            }
        }
    }

    #[test]
    fn zero_context_has_no_equal_ops(chunks in arb_chunk_stream()) {
        for h in generate_hunks(&chunks, 0) {
            prop_assert!(h.ops.iter().all(|o| o.op != Operation::Equal));
        }
    }

    #[test]
    fn wide_context_yields_one_hunk(chunks in arb_chunk_stream()) {
        let (from_len, to_len) = side_lengths(&chunks);
        let ctx = from_len.max(to_len);
        let hunks = generate_hunks(&chunks, ctx);
        let has_change = chunks.iter().any(|c| c.op != Operation::Equal);

        prop_assert_eq!(hunks.len(), usize::from(has_change));
        if has_change && from_len > 0 && to_len > 0 {
            prop_assert_eq!(hunks[0].from_start, 1);
            prop_assert_eq!(hunks[0].to_start, 1);
            prop_assert_eq!(hunks[0].from_count as usize, from_len);
            prop_assert_eq!(hunks[0].to_count as usize, to_len);
        }
    }

    #[test]
    fn applying_hunks_reproduces_new_side(chunks in arb_chunk_stream(), ctx in arb_context_lines()) {
        let old = side(&chunks, Operation::Delete);
        let new = side(&chunks, Operation::Add);
        let hunks = generate_hunks(&chunks, ctx);
        prop_assert_eq!(apply(&old, &hunks), Ok(new));
    }

    #[test]
    fn unterminated_line_appears_once(chunks in arb_chunk_stream(), ctx in arb_context_lines()) {
        let hunks = generate_hunks(&chunks, ctx);
        let flagged = hunks
            .iter()
            .flat_map(|h| h.ops.iter())
            .filter(|o| !o.line.newline)
            .count();
        prop_assert!(flagged <= 1);
    }
}
