// zfsctl-core/src/utils.rs
//! General utility functions.

/// Flattens multi-line diagnostic text into one line.
///
/// Each line is trimmed, empty lines are dropped and the rest are joined with `"; "`.
pub fn compact_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// First `max_lines` non-empty lines of `text` joined with `" | "`, for log previews.
pub fn preview_lines(text: &str, max_lines: usize) -> String {
    let preview = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(max_lines)
        .collect::<Vec<_>>()
        .join(" | ");
    if preview.is_empty() {
        "<no output>".to_string()
    } else {
        preview
    }
}
