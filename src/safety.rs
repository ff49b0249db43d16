//! Safety rails for output paths.
//!
//! Both binaries write a .js module right next to .js inputs, so a swapped
//! argument would overwrite a source catalog with generated output. The
//! output path is validated before anything opens for writing.

use anyhow::{bail, Result};
use std::path::Path;

/// Validates that an output path is safe to overwrite.
///
/// Checks, in order:
/// - the output filename carries the expected pattern (case-insensitive)
/// - the output is a `.js` module
/// - the output is not any of the input paths (literal comparison)
/// - the output does not look like a sheet export
pub fn validate_output_path(
    output: &Path,
    required_pattern: &str,
    source_paths: &[&Path],
) -> Result<()> {
    let output_name = output
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !output_name.contains(&required_pattern.to_lowercase()) {
        bail!(
            "Safety check failed: output file '{}' must contain '{}' in the name",
            output.display(),
            required_pattern
        );
    }

    let is_js = output
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("js"))
        .unwrap_or(false);
    if !is_js {
        bail!(
            "Safety check failed: output '{}' must be a .js module",
            output.display()
        );
    }

    for source in source_paths {
        if output == *source {
            bail!(
                "Safety check failed: output '{}' cannot be the same as input '{}'",
                output.display(),
                source.display()
            );
        }
    }

    // Names that belong to sheet exports; never write over one of those
    let protected = ["jubeat_list", "song_list"];
    for pattern in protected {
        if output_name.contains(pattern) {
            bail!(
                "Safety check failed: output '{}' matches source export pattern '{}'",
                output.display(),
                pattern
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_mapping_output() {
        let output = PathBuf::from("/tmp/jacketMapping.js");
        let songs = PathBuf::from("/data/songs.js");
        let sheet = PathBuf::from("/data/jubeat_song_list.csv");
        assert!(validate_output_path(&output, "mapping", &[&songs, &sheet]).is_ok());
    }

    #[test]
    fn test_valid_songs_output() {
        let output = PathBuf::from("/tmp/songs.js");
        let sheet = PathBuf::from("/data/jubeat_song_list.csv");
        assert!(validate_output_path(&output, "songs", &[&sheet]).is_ok());
    }

    #[test]
    fn test_pattern_match_ignores_case() {
        let output = PathBuf::from("/tmp/jacketMapping.js");
        assert!(validate_output_path(&output, "Mapping", &[]).is_ok());
    }

    #[test]
    fn test_missing_pattern() {
        let output = PathBuf::from("/tmp/output.js");
        let songs = PathBuf::from("/data/songs.js");
        let result = validate_output_path(&output, "mapping", &[&songs]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must contain 'mapping'"));
    }

    #[test]
    fn test_non_js_output_blocked() {
        let output = PathBuf::from("/tmp/jacketMapping.json");
        let result = validate_output_path(&output, "mapping", &[]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains(".js module"));
    }

    #[test]
    fn test_output_equals_source() {
        let path = PathBuf::from("/data/jacketMapping.js");
        let result = validate_output_path(&path, "mapping", &[&path]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("cannot be the same as input"));
    }

    #[test]
    fn test_sheet_export_names_blocked() {
        let output = PathBuf::from("/tmp/jubeat_list_mapping.js");
        let result = validate_output_path(&output, "mapping", &[]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("source export pattern"));
    }
}
