//! Mapping artifact rendering (jacketMapping.js).
//!
//! The artifact is a plain JS module with two named exports. Tables are
//! BTreeMaps, so serialization walks keys lexicographically and two equal
//! tables always render byte-identically. Keep it diffable; the file is
//! checked in on the consuming side.

use anyhow::{Context, Result};
use std::path::Path;

use crate::models::MappingTables;

const HEADER: &str = "\
// Auto-generated mapping from song titles to jacket asset IDs.
// Regenerate with the jacket-map tool; do not edit by hand.
";

/// Render the artifact source. Pretty JSON, two-space indent, UTF-8 titles
/// left unescaped.
pub fn render_module(tables: &MappingTables) -> Result<String> {
    let ids = serde_json::to_string_pretty(&tables.title_to_id)?;
    let versions = serde_json::to_string_pretty(&tables.title_to_version)?;
    Ok(format!(
        "{HEADER}\nexport const titleToId = {ids};\n\nexport const titleToVersion = {versions};\n"
    ))
}

/// Render and write the artifact in one shot.
pub fn write_module(path: &Path, tables: &MappingTables) -> Result<()> {
    let module = render_module(tables)?;
    std::fs::write(path, module)
        .with_context(|| format!("failed to write mapping module {}", path.display()))
}
