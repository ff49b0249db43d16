//! Shared title canonicalization for catalog reconciliation.
//! Used by both the jacket-map and generate-songs binaries.
//!
//! Both catalogs run through the same pipeline, so a rule only has to make
//! the two spellings of a title converge, not produce a "pretty" form.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use unicode_normalization::UnicodeNormalization;

/// The literal variant-marker token denoting an alternate chart of the same
/// track. Appears verbatim in reference titles (`Song A[2]`).
pub const VARIANT_MARKER: &str = "[2]";

/// Marker handling for key construction. Strip-marker keys identify the
/// underlying track and drive ID matching; keep-marker keys identify the
/// exact chart and drive version matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    StripMarker,
    KeepMarker,
}

/// Engine-level whitespace fold. `Collapse` squeezes whitespace runs to a
/// single space; `Strip` removes whitespace entirely and is strictly more
/// permissive for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceFold {
    Collapse,
    Strip,
}

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Whitespace-tolerant rendering of the marker token: `[ 2 ]`, `[2 ]`, ...
fn loose_marker_pattern(marker: &str) -> String {
    let mut pattern = String::new();
    for (i, ch) in marker.chars().enumerate() {
        if i > 0 {
            pattern.push_str(r"\s*");
        }
        pattern.push_str(&regex::escape(&ch.to_string()));
    }
    pattern
}

static MARKER_LOOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&loose_marker_pattern(VARIANT_MARKER)).unwrap());

static MARKER_LEADING_WS: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\s+{}", regex::escape(VARIANT_MARKER))).unwrap());

/// Matches a hyphen together with any whitespace hugging it.
static HYPHEN_SPACING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*-\s*").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// ============================================================================
// CHARACTER TABLES
// ============================================================================

/// Full-width punctuation → half-width. A fixed table rather than a blanket
/// compatibility decomposition; scripted characters (kana, kanji) are never
/// touched.
static FULLWIDTH_FORMS: Lazy<FxHashMap<char, char>> = Lazy::new(|| {
    let mut m = FxHashMap::default();
    for &(full, half) in &[
        ('？', '?'),
        ('！', '!'),
        ('＠', '@'),
        ('＃', '#'),
        ('＄', '$'),
        ('％', '%'),
        ('＆', '&'),
        ('（', '('),
        ('）', ')'),
        ('［', '['),
        ('］', ']'),
        ('｛', '{'),
        ('｝', '}'),
        ('：', ':'),
        ('；', ';'),
        ('＂', '"'),
        ('＇', '\''),
        ('，', ','),
        ('．', '.'),
        ('／', '/'),
        ('～', '~'),
        ('－', '-'),
        ('＋', '+'),
        ('＝', '='),
        ('＿', '_'),
        ('｜', '|'),
        ('＜', '<'),
        ('＞', '>'),
    ] {
        m.insert(full, half);
    }
    m
});

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn to_halfwidth(s: &str) -> String {
    s.chars()
        .map(|c| FULLWIDTH_FORMS.get(&c).copied().unwrap_or(c))
        .collect()
}

/// Curly/typographic quotes → straight quotes, both quote families.
fn straighten_quotes(s: &str) -> String {
    s.replace(['\u{201C}', '\u{201D}', '\u{201E}', '\u{201F}'], "\"")
        .replace(['\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'], "'")
}

/// Decorative glyphs that one catalog carries and the other drops or swaps:
/// hearts and stars vanish, traditional numerals become ascii letters,
/// interpuncts vanish in every width.
fn fold_decoratives(s: &str) -> String {
    s.replace(['♡', '♥', '☆', '★'], "")
        .replace('Ⅰ', "i")
        .replace('Ⅱ', "ii")
        .replace('Ⅲ', "iii")
        // Katakana middle dot, its half-width form, Latin middle dot
        .replace(['\u{30FB}', '\u{FF65}', '\u{00B7}'], "")
}

/// Check if a character sits in the Combining Diacritical Marks block.
fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F)
}

/// Decompose accented characters and drop their combining marks, reducing
/// accented Latin letters to their base letter. e.g. "Café" → "Cafe"
/// Canonical decomposition only; compatibility forms stay as they are.
fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

// ============================================================================
// CANONICAL KEYS
// ============================================================================

/// Canonical matching key for a title. Deterministic and total; the stage
/// order is fixed because each stage operates on the previous stage's output.
pub fn canonical_key(title: &str, mode: KeyMode, spaces: SpaceFold) -> String {
    let tight = MARKER_LOOSE.replace_all(title, VARIANT_MARKER);

    let marked = match mode {
        KeyMode::StripMarker => tight.replace(VARIANT_MARKER, "").trim().to_string(),
        KeyMode::KeepMarker => MARKER_LEADING_WS
            .replace_all(&tight, VARIANT_MARKER)
            .into_owned(),
    };

    let s = to_halfwidth(&marked);
    let s = straighten_quotes(&s);
    let s = fold_decoratives(&s);
    let s = strip_diacritics(&s);
    let s = HYPHEN_SPACING.replace_all(&s, "-");
    let s = match spaces {
        SpaceFold::Collapse => WHITESPACE_RUN.replace_all(&s, " ").trim().to_string(),
        SpaceFold::Strip => WHITESPACE_RUN.replace_all(&s, "").into_owned(),
    };

    s.to_lowercase()
}

/// A reference title with its variant marker removed and the ends trimmed,
/// otherwise verbatim. Output-table keys and override lookups use this form.
pub fn base_title(title: &str) -> String {
    MARKER_LOOSE.replace_all(title, "").trim().to_string()
}

// ============================================================================
// TESTS
// ============================================================================
