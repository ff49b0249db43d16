//! Generates the reference catalog module (songs.js) from the level sheet
//! export. One CSV row fans out into up to three entries, one per charted
//! difficulty; the variant marker stays in the title and also sets the
//! numeric chart field.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use jacket_map::normalize::VARIANT_MARKER;
use jacket_map::{progress, safety};

const DIFFICULTIES: [&str; 3] = ["BSC", "ADV", "EXT"];

#[derive(Parser)]
#[command(name = "generate-songs")]
#[command(about = "Generate the reference songs.js module from the level sheet export")]
struct Args {
    /// Level sheet export (CSV: title, artist, bpm, BSC, ADV, EXT)
    csv: PathBuf,

    /// Output module path (songs.js)
    output: PathBuf,

    /// Hide progress output and log to stderr instead
    #[arg(long)]
    log_only: bool,
}

#[derive(Clone, Debug)]
struct ChartEntry {
    title: String,
    artist: String,
    difficulty: &'static str,
    level: f64,
    chart: u8,
}

/// Parse the sheet into chart entries. Header rows repeat inside
/// concatenated exports, so they are dropped wherever they sit, not just
/// on the first line. Rows narrower than the six known columns are dropped;
/// a difficulty without a numeric level contributes no entry.
fn parse_songs<R: Read>(reader: R) -> Result<Vec<ChartEntry>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut entries = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.get(0) == Some("title") {
            continue;
        }
        if record.len() < 6 {
            continue;
        }
        let title = record.get(0).unwrap_or("").to_string();
        let artist = record.get(1).unwrap_or("").to_string();
        // Strict suffix check; the marker is part of the title and stays there
        let chart = if title.ends_with(VARIANT_MARKER) { 2 } else { 1 };

        for (difficulty, field) in DIFFICULTIES.into_iter().zip(3..6) {
            let level = record
                .get(field)
                .unwrap_or("")
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| !v.is_nan());
            if let Some(level) = level {
                entries.push(ChartEntry {
                    title: title.clone(),
                    artist: artist.clone(),
                    difficulty,
                    level,
                    chart,
                });
            }
        }
    }
    Ok(entries)
}

/// Render the module source. Number formatting matters downstream: whole
/// levels print bare (`7`), fractional ones keep their digits (`10.9`).
fn render_songs(entries: &[ChartEntry]) -> String {
    let songs = (entries.len() as f64 / 3.0).round() as usize;
    let mut out = String::new();
    out.push_str("// jubeat All Songs - BSC/ADV/EXT difficulties with chart version\n");
    out.push_str(&format!(
        "// Total: {} entries ({} songs × 3 difficulties)\n",
        entries.len(),
        songs
    ));
    out.push_str("export const allJubeatSongs = [\n");
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "  {{ title: '{}', artist: '{}', difficulty: '{}', level: {}, chart: {} }}",
            escape_single_quoted(&entry.title),
            escape_single_quoted(&entry.artist),
            entry.difficulty,
            entry.level,
            entry.chart
        ));
        out.push_str(if i + 1 < entries.len() { ",\n" } else { "\n" });
    }
    out.push_str("];\n");
    out
}

/// Backslashes first, then quotes, or the escape escapes itself.
fn escape_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

fn main() -> Result<()> {
    let args = Args::parse();
    progress::set_log_only(args.log_only);

    let start = Instant::now();

    safety::validate_output_path(&args.output, "songs", &[&args.csv])?;

    let spinner = progress::create_spinner("Parsing level sheet");
    let file = File::open(&args.csv)
        .with_context(|| format!("failed to open level sheet {}", args.csv.display()))?;
    let entries = parse_songs(file)
        .with_context(|| format!("failed to parse level sheet {}", args.csv.display()))?;
    if entries.is_empty() {
        bail!("no chart entries parsed from {}", args.csv.display());
    }
    spinner.finish_with_message(format!("Parsed {} chart entries", entries.len()));

    let module = render_songs(&entries);
    fs::write(&args.output, module)
        .with_context(|| format!("failed to write songs module {}", args.output.display()))?;

    let elapsed = start.elapsed();
    println!("\n{:=<60}", "");
    println!("Generation complete!");
    println!("  Entries: {}", entries.len());
    println!("  Songs:   {}", (entries.len() as f64 / 3.0).round() as usize);
    println!("  Output:  {}", args.output.display());
    println!("  Elapsed: {}", progress::format_duration(elapsed));
    println!("{:=<60}", "");

    Ok(())
}
