use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use jacket_map::models::TitleSet;
use jacket_map::normalize::SpaceFold;
use jacket_map::overrides::OverrideTable;
use jacket_map::resolve::Resolver;
use jacket_map::{catalog, emit, extract, progress, report, safety, sheet};

/// Whitespace fold this build runs with. `Strip` is the permissive mode;
/// `Collapse` keeps space-only spelling differences visible to overrides.
const SPACE_FOLD: SpaceFold = SpaceFold::Collapse;

#[derive(Parser)]
#[command(name = "jacket-map")]
#[command(about = "Reconcile reference song titles against the authoritative jacket catalog")]
struct Args {
    /// Reference catalog module (songs.js)
    songs: PathBuf,

    /// Authoritative catalog export (CSV: id, version, title)
    catalog: PathBuf,

    /// Output mapping module (jacketMapping.js)
    output: PathBuf,

    /// Write run statistics to this JSON file
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Hide progress bars and log phase progress to stderr instead
    #[arg(long)]
    log_only: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    progress::set_log_only(args.log_only);

    let start = Instant::now();

    // Nothing is written until this passes
    safety::validate_output_path(&args.output, "mapping", &[&args.songs, &args.catalog])?;

    let spinner = progress::create_spinner("Phase 1: Extracting reference titles");
    let source = fs::read_to_string(&args.songs)
        .with_context(|| format!("failed to read reference module {}", args.songs.display()))?;
    let extracted = extract::extract_titles(&source);
    if extracted.is_empty() {
        bail!(
            "no titles found in {} (expected title: '...' fields)",
            args.songs.display()
        );
    }
    let titles = TitleSet::from_titles(extracted);
    spinner.finish_with_message(format!(
        "Phase 1: {} titles ({} base)",
        titles.full.len(),
        titles.base.len()
    ));

    let spinner = progress::create_spinner("Phase 2: Reading catalog export");
    let rows = sheet::read_catalog_rows(&args.catalog)?;
    let index = catalog::build_index(&rows, SPACE_FOLD)?;
    spinner.finish_with_message(format!(
        "Phase 2: {} rows, {} distinct base keys",
        rows.len(),
        index.base.len()
    ));

    let overrides = OverrideTable::builtin();
    let pb = progress::create_progress_bar(
        (titles.base.len() + titles.full.len()) as u64,
        "Phase 3: Resolving",
    );
    let resolver = Resolver::new(&overrides, &index, SPACE_FOLD);
    let mut resolution = resolver.resolve(&titles, &pb);
    pb.finish_with_message(format!(
        "Phase 3: {} IDs matched, {} unmatched",
        resolution.tables.title_to_id.len(),
        resolution.unmatched.len()
    ));
    resolution.stats.catalog_rows = rows.len();

    emit::write_module(&args.output, &resolution.tables)?;

    let elapsed = start.elapsed();
    resolution.stats.elapsed_seconds = elapsed.as_secs_f64();

    // Report and stats come after the artifact is safely on disk; a stats
    // write failure downgrades to a warning
    report::print_summary(&resolution, &args.output, elapsed);
    resolution.stats.log("reconcile");
    if let Some(stats_path) = &args.stats {
        if let Err(err) = resolution.stats.write_to_file(stats_path) {
            eprintln!(
                "warning: failed to write stats file {}: {:#}",
                stats_path.display(),
                err
            );
        }
    }

    Ok(())
}
