//! Hand-curated title → ID pins.
//!
//! Each entry covers a pair of spellings the canonical key cannot bridge,
//! or a catalog row that needs pinning over an equally-matching sibling.
//! Keys are verbatim base titles (marker removed, ends trimmed, nothing
//! else); an override must stop working the moment the reference catalog
//! respells the title.

use rustc_hash::FxHashMap;

/// Built-in pins, one per known irreconcilable pair. Keep the entry comment
/// naming what differs between the two catalogs, so a pin can be retired
/// when either side gets fixed upstream.
const BUILTIN: &[(&str, &str)] = &[
    // Catalog row drops the remix suffix
    ("竹取飛翔 ～ Lunatic Princess (Ryu☆Remix)", "60000051"),
    // Catalog uses a variant spelling of the title
    ("ネトゲ廃人シュプレヒコール", "11000027"),
    // Catalog truncates the subtitle
    ("ALL MY HEART -この恋に、わたしの全てを賭ける-", "30000040"),
    // Stray space inside the subtitle on the reference side
    ("僕らの永遠～何度生まれ変わっても、 手を繋ぎたいだけの愛だから～", "40000021"),
    // Space inside the remix credit on the reference side only
    ("Right on time(Ryu☆ Remix)", "50000198"),
    // Full-width digit in the catalog subtitle
    ("Endless Chain ～2人でトリガーをひこう～", "50000232"),
    // Catalog spells it with ß
    ("Milchstrase", "50000276"),
    // Full-width asterisk in the catalog
    ("neko*neko", "60000082"),
    // Catalog carries an extra suffix
    ("Scream out!", "70000051"),
    // Heart glyph outside the folded set
    ("秘密がーる♡乙女", "70000172"),
    // Typographic apostrophe, and the catalog drops the arrangement credit
    ("Lachryma《Re:Queen’M》 (BEMANI SYMPHONY Arr.)", "90000205"),
    // Ellipsis spelled as three dots in the catalog
    ("遠く遠く離れていても…", "11000139"),
    // Spacing around the exclamation differs
    ("闘え! ダダンダーン V", "80000078"),
    // Catalog drops the digit commas
    ("10,000,000,000", "50000368"),
    // Spacing around the heart differs
    ("Love ♡ km", "30000041"),
    // Two catalog rows share the title; pin the playable one
    ("DANCE ALL NIGHT", "50000277"),
];

/// Exact-match override table consulted before any index lookup.
pub struct OverrideTable {
    entries: FxHashMap<String, String>,
}

impl OverrideTable {
    /// The shipped pin set.
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN.iter().copied())
    }

    /// No pins at all. Used by tests and by callers that want pure
    /// index resolution.
    pub fn empty() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let entries = pairs
            .into_iter()
            .map(|(title, id)| (title.to_string(), id.to_string()))
            .collect();
        Self { entries }
    }

    /// Look up a verbatim base title. No normalization happens here.
    pub fn get(&self, base_title: &str) -> Option<&str> {
        self.entries.get(base_title).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
