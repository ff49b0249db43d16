//! Core data models for catalog reconciliation.
//!
//! This module contains the struct definitions shared across the pipeline:
//! parsed catalog rows, the lookup indexes built from them, and the output
//! tables plus statistics produced by resolution.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::normalize;

/// Version label substituted when the authoritative catalog carries no
/// version for a row, and the fallback of last resort during resolution.
pub const DEFAULT_VERSION_LABEL: &str = "jubeat";

// ============================================================================
// Catalog Models
// ============================================================================

/// One row of the authoritative catalog, as parsed from the sheet export.
/// `id` keeps the original digit string; leading zeros survive to the output.
#[derive(Clone, Debug)]
pub struct CatalogRow {
    pub id: String,
    pub version: Option<String>,
    pub title: String,
}

/// Index payload for an ID lookup. `id_num` is the numeric value of `id`
/// and is used only for conflict ordering between duplicate keys.
#[derive(Clone, Debug)]
pub struct BaseEntry {
    pub source_title: String,
    pub id: String,
    pub id_num: u64,
}

/// Index payload for a version lookup.
#[derive(Clone, Debug)]
pub struct VersionEntry {
    pub source_title: String,
    pub version: String,
}

/// Lookup indexes built from the authoritative catalog. Keys are canonical
/// keys; `base` is keyed strip-marker, `full` keep-marker. `version_by_id`
/// backs the ID-fallback stage of version resolution.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    pub base: FxHashMap<String, BaseEntry>,
    pub full: FxHashMap<String, VersionEntry>,
    pub version_by_id: FxHashMap<String, String>,
}

// ============================================================================
// Reference Titles
// ============================================================================

/// Titles extracted from the reference catalog, split into the full set
/// (marker kept) and the deduplicated base set (marker removed). BTreeSet
/// fixes iteration order, which fixes resolution and report order.
#[derive(Debug, Default)]
pub struct TitleSet {
    pub full: BTreeSet<String>,
    pub base: BTreeSet<String>,
}

impl TitleSet {
    pub fn from_titles<I>(titles: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut set = TitleSet::default();
        for title in titles {
            set.base.insert(normalize::base_title(&title));
            set.full.insert(title);
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }
}

// ============================================================================
// Output Models
// ============================================================================

/// The two mapping tables the engine exists to produce. BTreeMap keys give
/// lexicographic iteration, so the emitted artifact is byte-stable across
/// runs regardless of input row order.
#[derive(Debug, Default)]
pub struct MappingTables {
    /// Base title → catalog ID (matched titles only)
    pub title_to_id: BTreeMap<String, String>,
    /// Full title → version label (every extracted title)
    pub title_to_version: BTreeMap<String, String>,
}

/// Everything resolution produces: the tables, the base titles that matched
/// nothing (sorted), and the run statistics.
#[derive(Debug, Default)]
pub struct Resolution {
    pub tables: MappingTables,
    pub unmatched: Vec<String>,
    pub stats: ReconcileStats,
}

// ============================================================================
// Statistics (Instrumentation)
// ============================================================================

/// Per-stage reconciliation statistics for instrumentation.
/// Counts inputs, how each lookup was satisfied, and the version histogram.
#[derive(Default, Debug, Clone, Serialize)]
pub struct ReconcileStats {
    // Inputs
    pub reference_titles: usize,
    pub base_titles: usize,
    pub catalog_rows: usize,

    // ID resolution outcomes
    pub id_overrides: usize,
    pub id_exact: usize,
    pub id_prefix: usize,
    pub id_unmatched: usize,

    // Version resolution outcomes
    pub version_exact: usize,
    pub version_prefix: usize,
    pub version_from_id: usize,
    pub version_defaulted: usize,

    // Version label → how many full titles landed on it
    pub version_counts: BTreeMap<String, usize>,

    // Timing
    pub elapsed_seconds: f64,
}

impl ReconcileStats {
    /// ID match rate as a percentage of base titles.
    pub fn match_rate(&self) -> f64 {
        if self.base_titles == 0 {
            0.0
        } else {
            100.0 * (self.base_titles - self.id_unmatched) as f64 / self.base_titles as f64
        }
    }

    /// Log stats to stderr in JSON format
    pub fn log(&self, label: &str) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            eprintln!("[STATS:{}]\n{}", label, json);
        }
    }

    /// Write stats to a JSON file
    pub fn write_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Bump the histogram bucket for a resolved version label.
    pub fn record_version(&mut self, label: &str) {
        *self.version_counts.entry(label.to_string()).or_insert(0) += 1;
    }
}
