use patchsmith_types::{Line, Operation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkOp {
    pub op: Operation,
    pub line: Line,
}

/// One `@@`-delimited block of a unified diff.
///
/// `from_count` always equals the number of Equal + Delete ops and `to_count`
/// the number of Equal + Add ops; [`Hunk::push`] is the only way ops are added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub from_start: u32,
    pub from_count: u32,
    pub to_start: u32,
    pub to_count: u32,
    /// Nearest unchanged line above the leading context, shown after `@@`.
    pub context_prefix: Option<String>,
    pub ops: Vec<HunkOp>,
}

impl Hunk {
    pub(crate) fn open(from_start: u32, to_start: u32, context_prefix: Option<String>) -> Self {
        Self {
            from_start,
            from_count: 0,
            to_start,
            to_count: 0,
            context_prefix,
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, op: Operation, line: Line) {
        match op {
            Operation::Equal => {
                self.from_count += 1;
                self.to_count += 1;
            }
            Operation::Add => self.to_count += 1,
            Operation::Delete => self.from_count += 1,
        }
        self.ops.push(HunkOp { op, line });
    }

    /// A side without lines is addressed by the line before the hunk, as git does.
    pub(crate) fn seal(mut self) -> Self {
        if self.from_count == 0 {
            self.from_start = self.from_start.saturating_sub(1);
        }
        if self.to_count == 0 {
            self.to_start = self.to_start.saturating_sub(1);
        }
        self
    }

    /// Iterate the lines of one side, in order.
    pub fn side(&self, side: Operation) -> impl Iterator<Item = &Line> {
        self.ops
            .iter()
            .filter(move |o| o.op == Operation::Equal || o.op == side)
            .map(|o| &o.line)
    }
}
