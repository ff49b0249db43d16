//! End-of-run console report.
//!
//! Purely observational: everything here runs after the artifact is on
//! disk, so a broken terminal can no longer cost a run.

use std::path::Path;
use std::time::Duration;

use crate::models::Resolution;
use crate::progress;

/// How many unmatched titles to dump before eliding the rest.
pub const UNMATCHED_PREVIEW_LIMIT: usize = 30;

pub fn print_summary(resolution: &Resolution, artifact: &Path, elapsed: Duration) {
    let stats = &resolution.stats;

    println!("\n{:=<60}", "");
    println!("RECONCILIATION COMPLETE");
    println!("{:=<60}", "");
    println!("Reference titles:   {}", stats.reference_titles);
    println!("Base titles:        {}", stats.base_titles);
    println!("Catalog rows:       {}", stats.catalog_rows);
    println!(
        "IDs matched:        {} ({:.1}%)",
        stats.base_titles - stats.id_unmatched,
        stats.match_rate()
    );
    println!("  via override:     {}", stats.id_overrides);
    println!("  via exact key:    {}", stats.id_exact);
    println!("  via prefix:       {}", stats.id_prefix);
    println!("IDs unmatched:      {}", stats.id_unmatched);
    println!();
    println!("Versions:");
    println!("  exact key:        {}", stats.version_exact);
    println!("  prefix:           {}", stats.version_prefix);
    println!("  from ID:          {}", stats.version_from_id);
    println!("  defaulted:        {}", stats.version_defaulted);
    if !stats.version_counts.is_empty() {
        println!();
        println!("Version histogram:");
        for (label, count) in &stats.version_counts {
            println!("  {:<24} {}", label, count);
        }
    }
    println!();
    println!("Artifact: {}", artifact.display());
    println!("Elapsed:  {}", progress::format_duration(elapsed));
    println!("{:=<60}", "");

    print_unmatched(&resolution.unmatched);
}

/// Dump unmatched titles as ready-to-paste override stubs. An operator
/// fixes these by filling in IDs, so print them in that shape.
fn print_unmatched(unmatched: &[String]) {
    if unmatched.is_empty() {
        return;
    }
    println!("\nUnmatched titles ({}), override stubs:", unmatched.len());
    for line in preview_lines(unmatched) {
        println!("{}", line);
    }
}

/// Stub lines capped at [`UNMATCHED_PREVIEW_LIMIT`]; anything beyond the
/// cap collapses into one elision line carrying the leftover count.
fn preview_lines(unmatched: &[String]) -> Vec<String> {
    let mut lines: Vec<String> = unmatched
        .iter()
        .take(UNMATCHED_PREVIEW_LIMIT)
        .map(|title| override_stub(title))
        .collect();
    if unmatched.len() > UNMATCHED_PREVIEW_LIMIT {
        lines.push(format!(
            "    ... and {} more",
            unmatched.len() - UNMATCHED_PREVIEW_LIMIT
        ));
    }
    lines
}

/// One override-table stub line. Debug formatting escapes quotes and
/// backslashes the way a Rust source line needs them.
fn override_stub(title: &str) -> String {
    format!("    ({:?}, \"\"),", title)
}
