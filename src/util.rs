//! Shared utility functions.

use pulldown_cmark_escape::{escape_href, escape_html, escape_html_body_text};

/// Convert text to a slug suitable for URLs and HTML ids.
///
/// Lowercases, turns whitespace and underscores into `-`, drops anything that
/// is not alphanumeric, and collapses runs of `-`.
/// "Hello World" -> "hello-world"
/// "What's New?" -> "whats-new"
/// "Type_Level  Programming" -> "type-level-programming"
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if (c == '-' || c == '_' || c.is_whitespace()) && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Escape text for HTML element content.
///
/// Only `&`, `<` and `>` are replaced; everything else passes through untouched
/// so code listings keep their exact characters.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_html_body_text(&mut out, s).expect("writing to a String cannot fail");
    out
}

/// Escape text for a double-quoted HTML attribute value.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_html(&mut out, s).expect("writing to a String cannot fail");
    out
}

/// Escape a link destination for an `href`.
///
/// Characters that are not valid in a URL are percent-encoded; `#`, `?` and
/// existing `%` escapes are kept.
pub fn escape_url(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_href(&mut out, s).expect("writing to a String cannot fail");
    out
}
