// src/core/sanitize.rs

use std::path::Path;

use crate::config::consts::{WING_TAG_FALLBACK, WING_TAG_MAX_CHARS};

/// Collapse every whitespace run to one space and trim the ends.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Drop the first `n` characters when the line is longer than `n`;
/// otherwise hand the line back untouched.
pub fn drop_label(line: &str, n: usize) -> String {
    if line.chars().count() > n {
        line.chars().skip(n).collect()
    } else {
        s!(line)
    }
}

/// Save paths typed without an extension get `.pdf`; empty stays empty.
pub fn with_pdf_extension(path: &str) -> String {
    let path = path.trim();
    if path.is_empty() || Path::new(path).extension().is_some() {
        s!(path)
    } else {
        join!(path, ".pdf")
    }
}

/// Split `"wing/cell"` on the LAST slash. No slash → (whole, "").
pub fn split_last_slash(s: &str) -> (String, String) {
    match s.rsplit_once('/') {
        Some((wing, cell)) => (s!(wing.trim()), s!(cell.trim())),
        None => (s!(s.trim()), s!()),
    }
}

/// First `max` characters (not bytes) of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Filename-safe tag for a wing selection: "/" and " " become "-",
/// wings are joined by "_", capped at 60 chars, "todas" when nothing is left.
pub fn wing_tag(wings: &[String]) -> String {
    let joined = wings
        .iter()
        .map(|w| w.replace('/', "-").replace(' ', "-"))
        .collect::<Vec<_>>()
        .join("_");
    let tag = truncate_chars(&joined, WING_TAG_MAX_CHARS);
    if tag.is_empty() { s!(WING_TAG_FALLBACK) } else { tag }
}

/// `http://` / `https://` prefix check, case-insensitive.
pub fn is_absolute_http(url: &str) -> bool {
    let lc = url.trim_start().to_ascii_lowercase();
    lc.starts_with("http://") || lc.starts_with("https://")
}
