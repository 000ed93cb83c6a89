//! A strict reader for plain unified-diff output.
//!
//! Used by round-trip tests: hunk bodies are read by their header counts, the
//! way patch tools consume them, so a count that disagrees with the body is an
//! error rather than silently tolerated.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// `' '`, `'+'` or `'-'`.
    pub kind: char,
    pub text: String,
    pub newline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHunk {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    pub section: Option<String>,
    pub lines: Vec<ParsedLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedFile {
    /// Path from `+++ b/...`, falling back to the `diff --git` line.
    pub path: Option<String>,
    /// Extended header lines between `diff --git` and the first hunk.
    pub header: Vec<String>,
    pub binary: bool,
    pub hunks: Vec<ParsedHunk>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("malformed hunk header: {0}")]
    MalformedHunkHeader(String),

    #[error("hunk `{0}` ended before its line counts were satisfied")]
    ShortHunk(String),

    #[error("unexpected line inside hunk: {0:?}")]
    UnexpectedLine(String),

    #[error("hunk found outside of a file section: {0}")]
    OrphanHunk(String),
}

/// Read `diff --git` file sections from `text`. Anything before the first
/// section (a commit message, say) is skipped.
pub fn parse_unified(text: &str) -> Result<Vec<ParsedFile>, ReadError> {
    let raw: Vec<&str> = text.split('\n').collect();
    let mut files: Vec<ParsedFile> = Vec::new();
    let mut i = 0;

    while i < raw.len() {
        let line = raw[i];
        i += 1;

        if let Some(rest) = line.strip_prefix("diff --git ") {
            files.push(ParsedFile {
                path: parse_diff_git_line(rest),
                ..ParsedFile::default()
            });
            continue;
        }

        let Some(file) = files.last_mut() else {
            if line.starts_with("@@") {
                return Err(ReadError::OrphanHunk(line.to_string()));
            }
            continue;
        };

        if line.starts_with("@@") {
            let mut hunk = parse_hunk_header(line)?;
            i = read_hunk_body(&raw, i, &mut hunk, line)?;
            file.hunks.push(hunk);
            continue;
        }

        if line.is_empty() {
            continue;
        }

        if !file.hunks.is_empty() {
            return Err(ReadError::UnexpectedLine(line.to_string()));
        }

        if line.starts_with("Binary files ") {
            file.binary = true;
        }
        if let Some(rest) = line.strip_prefix("+++ ") {
            if rest != "/dev/null" {
                file.path = Some(strip_side_prefix(rest));
            }
        }
        file.header.push(line.to_string());
    }

    Ok(files)
}

fn read_hunk_body(
    raw: &[&str],
    mut i: usize,
    hunk: &mut ParsedHunk,
    header: &str,
) -> Result<usize, ReadError> {
    let mut old_left = hunk.old_count;
    let mut new_left = hunk.new_count;

    while old_left > 0 || new_left > 0 {
        let Some(line) = raw.get(i) else {
            return Err(ReadError::ShortHunk(header.to_string()));
        };
        i += 1;

        if line.starts_with('\\') {
            mark_unterminated(hunk);
            continue;
        }

        let mut chars = line.chars();
        let kind = chars.next();
        let text = chars.as_str().to_string();
        match kind {
            Some(' ') if old_left > 0 && new_left > 0 => {
                old_left -= 1;
                new_left -= 1;
            }
            Some('-') if old_left > 0 => old_left -= 1,
            Some('+') if new_left > 0 => new_left -= 1,
            _ => return Err(ReadError::ShortHunk(header.to_string())),
        }
        hunk.lines.push(ParsedLine {
            kind: kind.unwrap_or(' '),
            text,
            newline: true,
        });
    }

    // A marker may follow the final line.
    if raw.get(i).is_some_and(|l| l.starts_with('\\')) {
        mark_unterminated(hunk);
        i += 1;
    }

    Ok(i)
}

fn mark_unterminated(hunk: &mut ParsedHunk) {
    if let Some(last) = hunk.lines.last_mut() {
        last.newline = false;
    }
}

fn parse_hunk_header(line: &str) -> Result<ParsedHunk, ReadError> {
    // Formats:
    // @@ -1,2 +3,4 @@ section
    // @@ -1 +3 @@
    let malformed = || ReadError::MalformedHunkHeader(line.to_string());

    let rest = line.strip_prefix("@@ ").ok_or_else(malformed)?;
    let (ranges, section) = rest.split_once(" @@").ok_or_else(malformed)?;
    let (old, new) = ranges.split_once(' ').ok_or_else(malformed)?;

    let (old_start, old_count) = parse_range(old.strip_prefix('-').ok_or_else(malformed)?)
        .ok_or_else(malformed)?;
    let (new_start, new_count) = parse_range(new.strip_prefix('+').ok_or_else(malformed)?)
        .ok_or_else(malformed)?;

    let section = section.strip_prefix(' ').map(str::to_string);

    Ok(ParsedHunk {
        old_start,
        old_count,
        new_start,
        new_count,
        section,
        lines: Vec::new(),
    })
}

fn parse_range(s: &str) -> Option<(u32, u32)> {
    match s.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((s.parse().ok()?, 1)),
    }
}

fn parse_diff_git_line(rest: &str) -> Option<String> {
    // a/foo b/foo
    let b = rest.split_whitespace().nth(1)?;
    Some(strip_side_prefix(b))
}

fn strip_side_prefix(p: &str) -> String {
    let p = p.split('\t').next().unwrap_or(p).trim();
    p.strip_prefix("a/")
        .or_else(|| p.strip_prefix("b/"))
        .unwrap_or(p)
        .to_string()
}
