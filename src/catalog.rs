//! Lookup-index construction from the authoritative catalog.
//!
//! Rows arrive in sheet order. Index contents must not depend on that
//! order except where the duplicate policy says so, hence the explicit
//! conflict handling on the base index.

use anyhow::{bail, Context, Result};
use std::collections::hash_map::Entry;

use crate::models::{BaseEntry, CatalogIndex, CatalogRow, VersionEntry, DEFAULT_VERSION_LABEL};
use crate::normalize::{canonical_key, KeyMode, SpaceFold};

/// Build the three lookup indexes from parsed catalog rows.
///
/// Duplicate policy: on the base (strip-marker) index the row with the
/// numerically higher ID wins, so re-releases shadow originals. The full
/// (keep-marker) index and the ID → version table are last-write-wins in
/// row order.
pub fn build_index(rows: &[CatalogRow], spaces: SpaceFold) -> Result<CatalogIndex> {
    let mut index = CatalogIndex::default();
    let mut kept = 0usize;

    for row in rows {
        if row.id.is_empty() || row.title.is_empty() {
            continue;
        }
        let id_num = parse_id(&row.id, &row.title)?;
        let version = row
            .version
            .clone()
            .unwrap_or_else(|| DEFAULT_VERSION_LABEL.to_string());

        let base_key = canonical_key(&row.title, KeyMode::StripMarker, spaces);
        if !base_key.is_empty() {
            match index.base.entry(base_key) {
                Entry::Occupied(mut slot) => {
                    if id_num > slot.get().id_num {
                        slot.insert(BaseEntry {
                            source_title: row.title.clone(),
                            id: row.id.clone(),
                            id_num,
                        });
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(BaseEntry {
                        source_title: row.title.clone(),
                        id: row.id.clone(),
                        id_num,
                    });
                }
            }
        }

        let full_key = canonical_key(&row.title, KeyMode::KeepMarker, spaces);
        if !full_key.is_empty() {
            index.full.insert(
                full_key,
                VersionEntry {
                    source_title: row.title.clone(),
                    version: version.clone(),
                },
            );
        }

        index.version_by_id.insert(row.id.clone(), version);
        kept += 1;
    }

    if kept == 0 {
        bail!("catalog export produced no usable rows (each row needs an ID and a title)");
    }

    Ok(index)
}

/// IDs are digit strings. The numeric value orders duplicates; the original
/// string, leading zeros included, is what the output carries.
fn parse_id(id: &str, title: &str) -> Result<u64> {
    id.parse::<u64>()
        .with_context(|| format!("non-numeric catalog ID {:?} for title {:?}", id, title))
}
