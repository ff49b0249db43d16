//! Two-stage resolution: catalog IDs for base titles, then version labels
//! for full titles. IDs resolve first because version resolution falls back
//! on the resolved ID when both version lookups miss.

use indicatif::ProgressBar;
use rustc_hash::FxHashMap;

use crate::models::{
    CatalogIndex, MappingTables, ReconcileStats, Resolution, TitleSet, DEFAULT_VERSION_LABEL,
};
use crate::normalize::{self, canonical_key, KeyMode, SpaceFold};
use crate::overrides::OverrideTable;
use crate::progress;

/// Minimum indexed-key length, in characters, for a prefix match.
/// Shorter keys front-match too much to be trusted.
pub const MIN_PREFIX_LEN: usize = 4;

/// Borrowing resolver over one override table and one catalog index.
/// The whitespace fold must be the one the index was built with, or keys
/// will not line up.
pub struct Resolver<'a> {
    overrides: &'a OverrideTable,
    index: &'a CatalogIndex,
    spaces: SpaceFold,
}

impl<'a> Resolver<'a> {
    pub fn new(overrides: &'a OverrideTable, index: &'a CatalogIndex, spaces: SpaceFold) -> Self {
        Self {
            overrides,
            index,
            spaces,
        }
    }

    /// Resolve every title in the set. Unmatched base titles are collected,
    /// never fatal; every full title leaves with a version label.
    pub fn resolve(&self, titles: &TitleSet, pb: &ProgressBar) -> Resolution {
        let mut stats = ReconcileStats {
            reference_titles: titles.full.len(),
            base_titles: titles.base.len(),
            ..Default::default()
        };
        let mut tables = MappingTables::default();
        let mut unmatched = Vec::new();
        let total = (titles.base.len() + titles.full.len()) as u64;
        let mut done = 0u64;

        // Stage one: IDs. Overrides win outright, then exact key lookup,
        // then prefix. BTreeSet iteration keeps `unmatched` sorted.
        for base in &titles.base {
            pb.inc(1);
            done += 1;
            progress::log_progress("resolve", done, total, 500);
            if let Some(id) = self.overrides.get(base) {
                tables.title_to_id.insert(base.clone(), id.to_string());
                stats.id_overrides += 1;
                continue;
            }
            let key = canonical_key(base, KeyMode::StripMarker, self.spaces);
            if let Some(entry) = self.index.base.get(&key) {
                tables.title_to_id.insert(base.clone(), entry.id.clone());
                stats.id_exact += 1;
            } else if let Some((_, entry)) = best_prefix(&key, &self.index.base) {
                tables.title_to_id.insert(base.clone(), entry.id.clone());
                stats.id_prefix += 1;
            } else {
                unmatched.push(base.clone());
                stats.id_unmatched += 1;
            }
        }

        // Stage two: versions. Exact, then prefix, then the version of the
        // ID stage one assigned to this title's base form, then the default.
        for full in &titles.full {
            pb.inc(1);
            done += 1;
            progress::log_progress("resolve", done, total, 500);
            let key = canonical_key(full, KeyMode::KeepMarker, self.spaces);
            let version = if let Some(entry) = self.index.full.get(&key) {
                stats.version_exact += 1;
                entry.version.clone()
            } else if let Some((_, entry)) = best_prefix(&key, &self.index.full) {
                stats.version_prefix += 1;
                entry.version.clone()
            } else if let Some(version) = tables
                .title_to_id
                .get(&normalize::base_title(full))
                .and_then(|id| self.index.version_by_id.get(id))
            {
                stats.version_from_id += 1;
                version.clone()
            } else {
                stats.version_defaulted += 1;
                DEFAULT_VERSION_LABEL.to_string()
            };
            stats.record_version(&version);
            tables.title_to_version.insert(full.clone(), version);
        }

        Resolution {
            tables,
            unmatched,
            stats,
        }
    }
}

/// Longest indexed key, of at least [`MIN_PREFIX_LEN`] characters, that
/// prefixes the query. Length ties break toward the lexicographically
/// smaller key, so map scan order never shows in the result.
fn best_prefix<'m, V>(query: &str, index: &'m FxHashMap<String, V>) -> Option<(&'m str, &'m V)> {
    let mut best: Option<(&'m str, usize, &'m V)> = None;
    for (key, value) in index {
        let key_chars = key.chars().count();
        if key_chars < MIN_PREFIX_LEN || !query.starts_with(key.as_str()) {
            continue;
        }
        let better = match &best {
            None => true,
            Some((held, held_chars, _)) => {
                key_chars > *held_chars || (key_chars == *held_chars && key.as_str() < *held)
            }
        };
        if better {
            best = Some((key.as_str(), key_chars, value));
        }
    }
    best.map(|(key, _, value)| (key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_index;
    use crate::models::CatalogRow;

    fn run(resolver: &Resolver<'_>, titles: &TitleSet) -> Resolution {
        resolver.resolve(titles, &ProgressBar::hidden())
    }

    fn index_of(rows: &[(&str, &str, &str)], spaces: SpaceFold) -> CatalogIndex {
        let rows: Vec<CatalogRow> = rows
            .iter()
            .map(|&(id, version, title)| CatalogRow {
                id: id.to_string(),
                version: (!version.is_empty()).then(|| version.to_string()),
                title: title.to_string(),
            })
            .collect();
        build_index(&rows, spaces).unwrap()
    }

    fn title_set(raw: &[&str]) -> TitleSet {
        TitleSet::from_titles(raw.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_exact_id_and_version() {
        let index = index_of(&[("10000001", "original", "EVANS")], SpaceFold::Collapse);
        let overrides = OverrideTable::empty();
        let resolver = Resolver::new(&overrides, &index, SpaceFold::Collapse);

        let out = run(&resolver, &title_set(&["Evans"]));
        assert_eq!(out.tables.title_to_id.get("Evans").unwrap(), "10000001");
        assert_eq!(out.tables.title_to_version.get("Evans").unwrap(), "original");
        assert_eq!(out.stats.id_exact, 1);
        assert_eq!(out.stats.version_exact, 1);
        assert!(out.unmatched.is_empty());
    }

    #[test]
    fn test_variant_marker_titles() {
        let index = index_of(
            &[
                ("10000001", "original", "Evans"),
                ("20000002", "extend", "Evans [2]"),
            ],
            SpaceFold::Collapse,
        );
        let overrides = OverrideTable::empty();
        let resolver = Resolver::new(&overrides, &index, SpaceFold::Collapse);

        let out = run(&resolver, &title_set(&["Evans", "Evans [2]"]));
        // Both catalog rows share the base key; the higher ID wins it
        assert_eq!(out.tables.title_to_id.get("Evans").unwrap(), "20000002");
        assert_eq!(out.tables.title_to_id.len(), 1);
        // Versions stay per chart
        assert_eq!(out.tables.title_to_version.get("Evans").unwrap(), "original");
        assert_eq!(out.tables.title_to_version.get("Evans [2]").unwrap(), "extend");
        assert_eq!(out.stats.base_titles, 1);
        assert_eq!(out.stats.reference_titles, 2);
    }

    #[test]
    fn test_override_beats_index() {
        let index = index_of(&[("11111111", "clan", "Milchstrase")], SpaceFold::Collapse);
        let overrides = OverrideTable::from_pairs([("Milchstrase", "50000276")]);
        let resolver = Resolver::new(&overrides, &index, SpaceFold::Collapse);

        let out = run(&resolver, &title_set(&["Milchstrase"]));
        assert_eq!(out.tables.title_to_id.get("Milchstrase").unwrap(), "50000276");
        assert_eq!(out.stats.id_overrides, 1);
        assert_eq!(out.stats.id_exact, 0);
    }

    #[test]
    fn test_prefix_needs_four_characters() {
        let overrides = OverrideTable::empty();

        // Indexed key "ab" is below the length floor
        let short = index_of(&[("30000003", "v", "ab")], SpaceFold::Collapse);
        let out = run(
            &Resolver::new(&overrides, &short, SpaceFold::Collapse),
            &title_set(&["abcdef"]),
        );
        assert_eq!(out.unmatched, vec!["abcdef".to_string()]);

        // Indexed key "abcd" qualifies and front-matches the longer query
        let long = index_of(&[("30000004", "v", "abcd")], SpaceFold::Collapse);
        let out = run(
            &Resolver::new(&overrides, &long, SpaceFold::Collapse),
            &title_set(&["abcdEF GH"]),
        );
        assert_eq!(out.tables.title_to_id.get("abcdEF GH").unwrap(), "30000004");
        assert_eq!(out.stats.id_prefix, 1);
    }

    #[test]
    fn test_prefix_prefers_longest_key() {
        let index = index_of(
            &[("40000001", "v", "abcd"), ("40000002", "v", "abcdef")],
            SpaceFold::Collapse,
        );
        let overrides = OverrideTable::empty();
        let resolver = Resolver::new(&overrides, &index, SpaceFold::Collapse);

        let out = run(&resolver, &title_set(&["abcdefgh"]));
        assert_eq!(out.tables.title_to_id.get("abcdefgh").unwrap(), "40000002");
    }

    #[test]
    fn test_unmatched_is_collected_not_fatal() {
        let index = index_of(&[("10000001", "original", "Evans")], SpaceFold::Collapse);
        let overrides = OverrideTable::empty();
        let resolver = Resolver::new(&overrides, &index, SpaceFold::Collapse);

        let out = run(&resolver, &title_set(&["Evans", "Zone Unknown"]));
        assert_eq!(out.unmatched, vec!["Zone Unknown".to_string()]);
        assert!(!out.tables.title_to_id.contains_key("Zone Unknown"));
        assert_eq!(out.stats.id_unmatched, 1);
        // The unmatched title still gets the default version
        assert_eq!(
            out.tables.title_to_version.get("Zone Unknown").unwrap(),
            DEFAULT_VERSION_LABEL
        );
        assert_eq!(out.stats.version_defaulted, 1);
    }

    #[test]
    fn test_version_falls_back_to_resolved_id() {
        // Full-key prefix cannot fire: "lol" is under the length floor
        let index = index_of(&[("10000001", "festo", "LOL")], SpaceFold::Collapse);
        let overrides = OverrideTable::empty();
        let resolver = Resolver::new(&overrides, &index, SpaceFold::Collapse);

        let out = run(&resolver, &title_set(&["LOL", "LOL [2]"]));
        assert_eq!(out.tables.title_to_version.get("LOL").unwrap(), "festo");
        assert_eq!(out.tables.title_to_version.get("LOL [2]").unwrap(), "festo");
        assert_eq!(out.stats.version_from_id, 1);
    }

    #[test]
    fn test_interpunct_widths_match_without_override() {
        let index = index_of(
            &[("50000386", "jubeat qubell", "Ha･lle･lu･jah")],
            SpaceFold::Collapse,
        );
        let overrides = OverrideTable::empty();
        let resolver = Resolver::new(&overrides, &index, SpaceFold::Collapse);

        // Reference spells the dots wide (U+30FB), the catalog half-width
        // (U+FF65); both tables must still land on the catalog row
        let out = run(&resolver, &title_set(&["Ha・lle・lu・jah"]));
        assert_eq!(
            out.tables.title_to_id.get("Ha・lle・lu・jah").unwrap(),
            "50000386"
        );
        assert_eq!(
            out.tables.title_to_version.get("Ha・lle・lu・jah").unwrap(),
            "jubeat qubell"
        );
        assert_eq!(out.stats.id_exact, 1);
        assert!(out.unmatched.is_empty());
    }

    #[test]
    fn test_space_fold_strip_bridges_embedded_spaces() {
        let rows = [("50000198", "saucer", "Right on time(Ryu☆Remix)")];
        let overrides = OverrideTable::empty();
        let query = title_set(&["Right on time(Ryu☆ Remix)"]);

        let collapse = index_of(&rows, SpaceFold::Collapse);
        let out = run(&Resolver::new(&overrides, &collapse, SpaceFold::Collapse), &query);
        assert_eq!(out.stats.id_unmatched, 1);

        let strip = index_of(&rows, SpaceFold::Strip);
        let out = run(&Resolver::new(&overrides, &strip, SpaceFold::Strip), &query);
        assert_eq!(
            out.tables.title_to_id.get("Right on time(Ryu☆ Remix)").unwrap(),
            "50000198"
        );
    }

    #[test]
    fn test_every_full_title_gets_a_version() {
        let index = index_of(
            &[("10000001", "original", "Evans"), ("20000002", "", "Macuilxochitl")],
            SpaceFold::Collapse,
        );
        let overrides = OverrideTable::empty();
        let resolver = Resolver::new(&overrides, &index, SpaceFold::Collapse);

        let titles = title_set(&["Evans", "Evans [2]", "Macuilxochitl", "Never Heard Of"]);
        let out = run(&resolver, &titles);
        for full in &titles.full {
            assert!(
                out.tables.title_to_version.contains_key(full),
                "missing version for {full:?}"
            );
        }
        let histogram_total: usize = out.stats.version_counts.values().sum();
        assert_eq!(histogram_total, titles.full.len());
    }

    #[test]
    fn test_repeated_runs_render_identically() {
        let rows = [
            ("10000001", "original", "Evans"),
            ("20000002", "extend", "Evans [2]"),
            ("50000386", "qubell", "Ha･lle･lu･jah"),
        ];
        let titles = title_set(&["Evans", "Evans [2]", "Ha・lle・lu・jah", "Zone Unknown"]);
        let overrides = OverrideTable::builtin();

        let render = || {
            let index = index_of(&rows, SpaceFold::Collapse);
            let out = run(&Resolver::new(&overrides, &index, SpaceFold::Collapse), &titles);
            (crate::emit::render_module(&out.tables).unwrap(), out.unmatched)
        };
        let (first_module, first_unmatched) = render();
        let (second_module, second_unmatched) = render();
        assert_eq!(first_module, second_module);
        assert_eq!(first_unmatched, second_unmatched);
    }

    #[test]
    fn test_match_rate() {
        let index = index_of(&[("10000001", "original", "Evans")], SpaceFold::Collapse);
        let overrides = OverrideTable::from_pairs([("Pinned", "99999999")]);
        let resolver = Resolver::new(&overrides, &index, SpaceFold::Collapse);

        let out = run(&resolver, &title_set(&["Evans", "Pinned", "Missing One"]));
        assert_eq!(out.stats.id_exact, 1);
        assert_eq!(out.stats.id_overrides, 1);
        assert_eq!(out.stats.id_unmatched, 1);
        assert!((out.stats.match_rate() - 200.0 / 3.0).abs() < 1e-9);
    }
}
