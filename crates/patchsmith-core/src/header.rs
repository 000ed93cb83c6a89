use patchsmith_types::{FileChange, ObjectId};

/// Derive the extended header lines for one file pair.
///
/// The first line is always `diff --git a/<from> b/<to>`. The `---`/`+++`
/// pair (or the `Binary files ... differ` line) is only emitted when the
/// content hashes differ.
pub fn format_header(change: &FileChange, binary: bool) -> Vec<String> {
    let mut lines = Vec::new();

    match change {
        FileChange::Modified { from, to } => {
            let same_content = from.hash == to.hash;
            let mode_changed = from.mode != to.mode;

            lines.push(format!("diff --git a/{} b/{}", from.path, to.path));
            if mode_changed {
                lines.push(format!("old mode {}", from.mode));
                lines.push(format!("new mode {}", to.mode));
            }
            if from.path != to.path {
                lines.push(format!("rename from {}", from.path));
                lines.push(format!("rename to {}", to.path));
            }
            if !same_content {
                // With a mode change the mode is already on its own lines,
                // so the index line drops its suffix.
                if mode_changed {
                    lines.push(format!("index {}..{}", from.hash, to.hash));
                } else {
                    lines.push(format!("index {}..{} {}", from.hash, to.hash, from.mode));
                }
                push_body(
                    &mut lines,
                    &format!("a/{}", from.path),
                    &format!("b/{}", to.path),
                    binary,
                );
            }
        }
        FileChange::Added { to } => {
            lines.push(format!("diff --git a/{} b/{}", to.path, to.path));
            lines.push(format!("new file mode {}", to.mode));
            lines.push(format!("index {}..{}", ObjectId::ZERO, to.hash));
            push_body(&mut lines, "/dev/null", &format!("b/{}", to.path), binary);
        }
        FileChange::Deleted { from } => {
            lines.push(format!("diff --git a/{} b/{}", from.path, from.path));
            lines.push(format!("deleted file mode {}", from.mode));
            lines.push(format!("index {}..{}", from.hash, ObjectId::ZERO));
            push_body(&mut lines, &format!("a/{}", from.path), "/dev/null", binary);
        }
    }

    lines
}

fn push_body(lines: &mut Vec<String>, from_ref: &str, to_ref: &str, binary: bool) {
    if binary {
        lines.push(format!("Binary files {from_ref} and {to_ref} differ"));
    } else {
        lines.push(format!("--- {from_ref}"));
        lines.push(format!("+++ {to_ref}"));
    }
}
