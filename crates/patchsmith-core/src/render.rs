use patchsmith_hunks::{generate_hunks, Hunk, HunkOp};
use patchsmith_types::{FilePatch, OutputFormat, NO_NEWLINE_MARKER};

use crate::escape::escape_html;
use crate::header::format_header;

/// Render one file patch: header lines, then its hunks.
///
/// Binary files stop after the header. Returns the text and the number of
/// hunks written.
pub fn render_file_patch(
    file: &FilePatch,
    context_lines: usize,
    format: OutputFormat,
) -> (String, usize) {
    let mut out = String::new();

    for line in format_header(&file.change, file.binary) {
        push_plain_line(&mut out, &line, format);
    }

    if file.binary {
        return (out, 0);
    }

    let hunks = generate_hunks(&file.chunks, context_lines);
    for hunk in &hunks {
        render_hunk(&mut out, hunk, format);
    }
    (out, hunks.len())
}

/// `@@ -<from>[,<count>] +<to>[,<count>] @@[ <prefix>]`, without newline.
///
/// A count of exactly one is left implicit.
pub fn render_hunk_header(hunk: &Hunk) -> String {
    let mut s = String::from("@@ -");
    push_range(&mut s, hunk.from_start, hunk.from_count);
    s.push_str(" +");
    push_range(&mut s, hunk.to_start, hunk.to_count);
    s.push_str(" @@");
    if let Some(prefix) = hunk.context_prefix.as_deref() {
        s.push(' ');
        s.push_str(prefix);
    }
    s
}

fn push_range(s: &mut String, start: u32, count: u32) {
    if count == 1 {
        s.push_str(&start.to_string());
    } else {
        s.push_str(&format!("{start},{count}"));
    }
}

/// Append a hunk header and one line per op.
pub fn render_hunk(out: &mut String, hunk: &Hunk, format: OutputFormat) {
    push_plain_line(out, &render_hunk_header(hunk), format);
    for op in &hunk.ops {
        match format {
            OutputFormat::Plain => push_op_plain(out, op),
            OutputFormat::Markup => push_op_markup(out, op),
        }
    }
}

fn push_plain_line(out: &mut String, line: &str, format: OutputFormat) {
    match format {
        OutputFormat::Plain => out.push_str(line),
        OutputFormat::Markup => out.push_str(&escape_html(line)),
    }
    out.push('\n');
}

fn push_op_plain(out: &mut String, op: &HunkOp) {
    out.push(op.op.prefix());
    out.push_str(&op.line.text);
    out.push('\n');
    if !op.line.newline {
        out.push_str(NO_NEWLINE_MARKER);
        out.push('\n');
    }
}

fn push_op_markup(out: &mut String, op: &HunkOp) {
    out.push_str("<span class=\"");
    out.push_str(op.op.class());
    out.push_str("\">");
    out.push(op.op.prefix());
    out.push_str(&escape_html(&op.line.text));
    if !op.line.newline {
        out.push('\n');
        out.push_str(NO_NEWLINE_MARKER);
    }
    out.push_str("</span>\n");
}
