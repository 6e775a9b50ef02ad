//! Pure text transforms used by multi-step operations
//!
//! The dispatcher sequences CLI calls; these functions do the client-side
//! work between them and never touch a process.

use chrono::Local;

/// Default prefix of an open checklist item
pub const OPEN_TASK_MARKER: &str = "- [ ]";

/// Folder holding one sub-folder per project
pub const PROJECTS_PREFIX: &str = "Projects/";

/// Completion timestamp in local time, e.g. `2026-10-19 14:05`
pub fn completion_stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}

/// Marker that replaces `marker` on a completed line: the first `[ ]`
/// becomes `[x]`.
pub fn done_marker(marker: &str) -> String {
    marker.replacen("[ ]", "[x]", 1)
}

/// Rewrite the first line that starts with `marker` (after indentation) and
/// contains `needle`, swapping in the done marker and appending
/// ` @done (<stamp>)`. Every other byte of `text` is preserved, including
/// line endings. Indentation is ignored on both the lines and `marker`.
/// Returns `None` when no line matches.
pub fn mark_line_done(text: &str, marker: &str, needle: &str, stamp: &str) -> Option<String> {
    let marker = marker.trim_start();
    if marker.is_empty() {
        return None;
    }

    let mut lines: Vec<&str> = text.split('\n').collect();

    let index = lines.iter().position(|line| {
        let body = line.trim_start();
        body.starts_with(marker) && body[marker.len()..].contains(needle)
    })?;

    let line = lines[index];
    let (content, cr) = match line.strip_suffix('\r') {
        Some(stripped) => (stripped, "\r"),
        None => (line, ""),
    };
    let indent_len = content.len() - content.trim_start().len();
    let (indent, body) = content.split_at(indent_len);
    let rest = body[marker.len()..].trim_end();

    let rewritten = format!("{indent}{}{rest} @done ({stamp}){cr}", done_marker(marker));
    lines[index] = &rewritten;

    Some(lines.join("\n"))
}

/// Unique names of the first path segment under `prefix`, in first-seen
/// order. Only entries with a further `/` after that segment count, so
/// loose files directly under `prefix` are skipped.
pub fn group_first_segments(listing: &str, prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for entry in listing.lines().map(str::trim) {
        let Some(rest) = entry.strip_prefix(prefix) else {
            continue;
        };
        let Some((segment, _)) = rest.split_once('/') else {
            continue;
        };
        if !segment.is_empty() && !names.iter().any(|n| n == segment) {
            names.push(segment.to_string());
        }
    }

    names
}

/// Path of a project's README
pub fn project_readme(name: &str) -> String {
    format!("{PROJECTS_PREFIX}{name}/README.md")
}

/// Path of a project's task list
pub fn project_tasks(name: &str) -> String {
    format!("{PROJECTS_PREFIX}{name}/Tasks.md")
}

/// Initial README content: frontmatter followed by a title and description
pub fn project_readme_content(name: &str, status: &str, description: Option<&str>, created: &str) -> String {
    let mut content = format!("---\nstatus: {status}\ncreated: {created}\n---\n\n# {name}\n");
    if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
        content.push('\n');
        content.push_str(description.trim());
        content.push('\n');
    }
    content
}
