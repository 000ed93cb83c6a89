use std::collections::VecDeque;

use patchsmith_types::{Chunk, Line, Operation};
use tracing::trace;

use crate::hunk::Hunk;

/// Generate hunks for one file's chunk stream.
///
/// `context_lines` bounds the unchanged lines kept around each change; two
/// changes separated by at most `2 * context_lines` unchanged lines share a
/// hunk. Empty chunks are ignored.
pub fn generate_hunks(chunks: &[Chunk], context_lines: usize) -> Vec<Hunk> {
    let mut generator = HunkGenerator::new(context_lines);
    for chunk in chunks {
        generator.push_chunk(chunk);
    }
    generator.finish()
}

/// Single-pass hunk accumulator.
///
/// Feed chunks in file order with [`HunkGenerator::push_chunk`], then call
/// [`HunkGenerator::finish`]. State lives only for one file.
#[derive(Debug)]
pub struct HunkGenerator {
    context_lines: usize,

    // Lines consumed so far on each side.
    from_line: u32,
    to_line: u32,

    // Unchanged lines seen while no hunk is open. Holds at most
    // `context_lines + 1`: the leading context plus the prefix hint.
    before: VecDeque<Line>,
    // Unchanged lines after the open hunk's last change. Never longer than
    // `2 * context_lines`.
    after: Vec<Line>,

    current: Option<Hunk>,
    hunks: Vec<Hunk>,
}

impl HunkGenerator {
    pub fn new(context_lines: usize) -> Self {
        Self {
            context_lines,
            from_line: 0,
            to_line: 0,
            before: VecDeque::with_capacity(context_lines + 1),
            after: Vec::new(),
            current: None,
            hunks: Vec::new(),
        }
    }

    pub fn push_chunk(&mut self, chunk: &Chunk) {
        match chunk.op {
            Operation::Equal => {
                for line in &chunk.lines {
                    self.from_line += 1;
                    self.to_line += 1;
                    self.push_equal(line.clone());
                }
            }
            Operation::Add | Operation::Delete => {
                if chunk.is_empty() {
                    return;
                }
                self.open_hunk();
                let Some(hunk) = self.current.as_mut() else {
                    return;
                };
                for line in &chunk.lines {
                    hunk.push(chunk.op, line.clone());
                }
                let n = chunk.len() as u32;
                match chunk.op {
                    Operation::Delete => self.from_line += n,
                    Operation::Add => self.to_line += n,
                    Operation::Equal => {}
                }
            }
        }
    }

    /// Seal the open hunk, if any, and return all hunks in file order.
    pub fn finish(mut self) -> Vec<Hunk> {
        if self.current.is_some() {
            let keep = self.context_lines.min(self.after.len());
            self.seal(keep);
        }
        self.hunks
    }

    fn push_equal(&mut self, line: Line) {
        if self.current.is_none() {
            self.before.push_back(line);
            if self.before.len() > self.context_lines + 1 {
                self.before.pop_front();
            }
            return;
        }

        self.after.push(line);
        if self.after.len() > self.context_lines * 2 {
            self.seal(self.context_lines);
        }
    }

    /// Open a hunk at the current position, or fold pending after-context
    /// into the already open one.
    fn open_hunk(&mut self) {
        if let Some(hunk) = self.current.as_mut() {
            for line in self.after.drain(..) {
                hunk.push(Operation::Equal, line);
            }
            return;
        }

        let mut context_prefix = None;
        if self.before.len() > self.context_lines {
            context_prefix = self
                .before
                .pop_front()
                .map(|l| l.text)
                .filter(|t| !t.is_empty());
        }

        let leading = self.before.len() as u32;
        let mut hunk = Hunk::open(
            self.from_line - leading + 1,
            self.to_line - leading + 1,
            context_prefix,
        );
        for line in self.before.drain(..) {
            hunk.push(Operation::Equal, line);
        }
        self.current = Some(hunk);
    }

    /// Move `keep` after-context lines into the open hunk and emit it. The
    /// rest of the after-context becomes before-context for the next hunk.
    fn seal(&mut self, keep: usize) {
        let Some(mut hunk) = self.current.take() else {
            return;
        };

        let mut pending = std::mem::take(&mut self.after).into_iter();
        for line in pending.by_ref().take(keep) {
            hunk.push(Operation::Equal, line);
        }
        for line in pending {
            self.before.push_back(line);
            if self.before.len() > self.context_lines + 1 {
                self.before.pop_front();
            }
        }

        let hunk = hunk.seal();
        trace!(
            from_start = hunk.from_start,
            from_count = hunk.from_count,
            to_start = hunk.to_start,
            to_count = hunk.to_count,
            "sealed hunk"
        );
        self.hunks.push(hunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(lines: &[&str]) -> Chunk {
        Chunk::new(Operation::Equal, lines.iter().map(|l| Line::new(*l)).collect())
    }

    fn add(lines: &[&str]) -> Chunk {
        Chunk::new(Operation::Add, lines.iter().map(|l| Line::new(*l)).collect())
    }

    fn del(lines: &[&str]) -> Chunk {
        Chunk::new(Operation::Delete, lines.iter().map(|l| Line::new(*l)).collect())
    }

    fn ops(h: &Hunk) -> Vec<(Operation, &str)> {
        h.ops.iter().map(|o| (o.op, o.line.text.as_str())).collect()
    }

    #[test]
    fn single_line_replacement_with_one_line_context() {
        let chunks = vec![eq(&["a"]), del(&["b"]), add(&["B"]), eq(&["c", "d"])];
        let hunks = generate_hunks(&chunks, 1);

        assert_eq!(hunks.len(), 1);
        let h = &hunks[0];
        assert_eq!(
            (h.from_start, h.from_count, h.to_start, h.to_count),
            (1, 3, 1, 3)
        );
        assert_eq!(
            ops(h),
            vec![
                (Operation::Equal, "a"),
                (Operation::Delete, "b"),
                (Operation::Add, "B"),
                (Operation::Equal, "c"),
            ]
        );
        assert_eq!(h.context_prefix, None);
    }

    #[test]
    fn older_before_context_becomes_prefix() {
        let chunks = vec![eq(&["fn main() {", "x", "y", "z"]), add(&["new"])];
        let hunks = generate_hunks(&chunks, 2);

        assert_eq!(hunks.len(), 1);
        let h = &hunks[0];
        assert_eq!(h.context_prefix.as_deref(), Some("x"));
        assert_eq!((h.from_start, h.from_count), (3, 2));
        assert_eq!((h.to_start, h.to_count), (3, 3));
    }

    #[test]
    fn blank_prefix_line_is_not_a_hint() {
        let chunks = vec![eq(&["", "a"]), del(&["b"])];
        let hunks = generate_hunks(&chunks, 1);
        assert_eq!(hunks[0].context_prefix, None);
    }

    #[test]
    fn close_changes_merge_into_one_hunk() {
        // Four unchanged lines between changes, threshold is 2 * 2.
        let chunks = vec![
            del(&["a"]),
            eq(&["1", "2", "3", "4"]),
            add(&["b"]),
            eq(&["5"]),
        ];
        let hunks = generate_hunks(&chunks, 2);
        assert_eq!(hunks.len(), 1);
        assert_eq!((hunks[0].from_count, hunks[0].to_count), (6, 6));
    }

    #[test]
    fn distant_changes_split_into_two_hunks() {
        let chunks = vec![
            del(&["a"]),
            eq(&["1", "2", "3", "4", "5"]),
            add(&["b"]),
        ];
        let hunks = generate_hunks(&chunks, 2);
        assert_eq!(hunks.len(), 2);

        let first = &hunks[0];
        assert_eq!(ops(first).len(), 3);
        assert_eq!((first.from_start, first.from_count), (1, 3));
        assert_eq!((first.to_start, first.to_count), (1, 2));

        let second = &hunks[1];
        assert_eq!(second.context_prefix.as_deref(), Some("3"));
        assert_eq!((second.from_start, second.from_count), (5, 2));
        assert_eq!((second.to_start, second.to_count), (4, 3));
    }

    #[test]
    fn zero_context_has_no_equal_ops() {
        let chunks = vec![
            eq(&["a", "b"]),
            del(&["c"]),
            add(&["C"]),
            eq(&["d"]),
            del(&["e"]),
        ];
        let hunks = generate_hunks(&chunks, 0);
        assert_eq!(hunks.len(), 2);
        assert!(hunks
            .iter()
            .all(|h| h.ops.iter().all(|o| o.op != Operation::Equal)));
        assert_eq!((hunks[0].from_start, hunks[0].to_start), (3, 3));
        assert_eq!(hunks[0].context_prefix.as_deref(), Some("b"));
        // Pure deletion: the new side is addressed by the line before.
        assert_eq!((hunks[1].from_start, hunks[1].from_count), (5, 1));
        assert_eq!((hunks[1].to_start, hunks[1].to_count), (4, 0));
    }

    #[test]
    fn new_file_starts_at_zero_on_old_side() {
        let hunks = generate_hunks(&[add(&["a", "b"])], 3);
        assert_eq!(hunks.len(), 1);
        let h = &hunks[0];
        assert_eq!(
            (h.from_start, h.from_count, h.to_start, h.to_count),
            (0, 0, 1, 2)
        );
    }

    #[test]
    fn trailing_context_is_truncated_at_end_of_file() {
        let hunks = generate_hunks(&[del(&["a"]), eq(&["b"])], 3);
        assert_eq!(ops(&hunks[0]), vec![(Operation::Delete, "a"), (Operation::Equal, "b")]);
    }

    #[test]
    fn only_equal_chunks_produce_nothing() {
        assert!(generate_hunks(&[eq(&["a", "b"])], 3).is_empty());
        assert!(generate_hunks(&[], 3).is_empty());
    }

    #[test]
    fn empty_chunks_are_ignored() {
        let with_empty = vec![eq(&["a"]), add(&[]), del(&["b"]), eq(&[]), eq(&["c"])];
        let without = vec![eq(&["a"]), del(&["b"]), eq(&["c"])];
        assert_eq!(generate_hunks(&with_empty, 1), generate_hunks(&without, 1));
    }

    #[test]
    fn missing_newline_flag_passes_through() {
        let chunks = vec![
            eq(&["a"]),
            Chunk::new(Operation::Delete, vec![Line::without_newline("b")]),
            Chunk::new(Operation::Add, vec![Line::new("b")]),
        ];
        let hunks = generate_hunks(&chunks, 3);
        let deleted = &hunks[0].ops[1];
        assert_eq!(deleted.op, Operation::Delete);
        assert!(!deleted.line.newline);
        assert!(hunks[0].ops[2].line.newline);
    }
}
