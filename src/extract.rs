//! Title extraction from the reference catalog module (songs.js).
//!
//! The module is not parsed as JavaScript. Titles are lifted straight out
//! of the `title: '...'` fields, which is exactly as much syntax as the
//! generator on the other end ever writes.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a single-quoted `title` field, honoring backslash escapes the
/// way the module writes them (`\'` inside a title).
static TITLE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"title:\s*'((?:[^'\\]|\\.)*)'").unwrap());

/// Pull every title out of the reference module source, in file order,
/// duplicates included. Escapes are undone so titles carry their real
/// apostrophes and backslashes.
pub fn extract_titles(source: &str) -> Vec<String> {
    TITLE_FIELD
        .captures_iter(source)
        .map(|cap| unescape(&cap[1]))
        .collect()
}

/// Undo the module's backslash escaping: `\x` becomes `x` for any `x`.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
