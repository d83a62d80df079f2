// src/util.rs — Shared string helpers

/// Truncate a string for display/logging (UTF-8 safe).
///
/// Returns a substring of at most `max_len` bytes, cut on a character
/// boundary.
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// First non-blank line of `s`, at most `max_len` bytes, with `...` appended
/// when anything was left out.
pub fn one_line_preview(s: &str, max_len: usize) -> String {
    let body = s.trim();
    let first = body.lines().next().unwrap_or("");
    let short = truncate_str(first, max_len);
    if short.len() < body.len() {
        format!("{short}...")
    } else {
        short.to_string()
    }
}
