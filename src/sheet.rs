//! Authoritative catalog ingestion from the sheet export (CSV).
//!
//! Column order is fixed: ID, version label, title. The first row is the
//! header and is skipped. Anything past the third column is ignored.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::models::CatalogRow;

/// Read catalog rows from a sheet export on disk. Rows missing an ID or a
/// title are dropped here, before indexing ever sees them; short rows are
/// tolerated rather than rejected.
pub fn read_catalog_rows(path: &Path) -> Result<Vec<CatalogRow>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open catalog export {}", path.display()))?;
    parse_catalog(file).with_context(|| format!("failed to parse catalog export {}", path.display()))
}

fn parse_catalog<R: Read>(reader: R) -> Result<Vec<CatalogRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let id = record.get(0).unwrap_or("").trim();
        let version = record.get(1).unwrap_or("").trim();
        let title = record.get(2).unwrap_or("").trim();
        if id.is_empty() || title.is_empty() {
            continue;
        }
        rows.push(CatalogRow {
            id: id.to_string(),
            version: (!version.is_empty()).then(|| version.to_string()),
            title: title.to_string(),
        });
    }
    Ok(rows)
}
