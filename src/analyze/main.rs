//! Point analysis command.
//!
//! Loads a delimited point file and a GeoJSON boundary, classifies every row,
//! logs a summary, and optionally exports each partition.

mod config;
mod export;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use geosieve::models::{Outcome, Record, ResultBundle};
use geosieve::pip::{load_boundary, prepare};
use geosieve::source::{read_records_from_path, Delimiter};
use geosieve::{GeosieveError, Pipeline, RecordSet};

use crate::config::AnalyzeConfig;

#[derive(Parser, Debug)]
#[command(name = "analyze")]
#[command(about = "Classify CSV points against a GeoJSON boundary")]
struct Args {
    /// Delimited text file with one point per row (.gz accepted)
    #[arg(short, long)]
    points: PathBuf,

    /// GeoJSON boundary (Polygon / MultiPolygon, any number of features)
    #[arg(short, long)]
    boundary: PathBuf,

    /// Optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Field delimiter: ",", ";", "tab", "|", or any single character
    #[arg(short, long)]
    delimiter: Option<Delimiter>,

    /// Longitude column (defaults to the first column)
    #[arg(short = 'x', long)]
    x_field: Option<String>,

    /// Latitude column (defaults to the second column)
    #[arg(short = 'y', long)]
    y_field: Option<String>,

    /// Directory for partition exports and summary.json
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Give up on classification after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AnalyzeConfig::load_from_file(path)?,
        None => AnalyzeConfig::default(),
    };
    if let Some(delimiter) = args.delimiter {
        config.input.delimiter = delimiter;
    }
    if args.out_dir.is_some() {
        config.output.dir = args.out_dir.clone();
    }

    let delimiter = config.input.delimiter;
    info!("Geosieve point analysis");
    info!("Points: {} (delimiter {})", args.points.display(), delimiter);
    info!("Boundary: {}", args.boundary.display());

    if delimiter.conflicts_with_decimal_comma() {
        warn!("Field delimiter is ','; commas inside values are read as decimal separators");
    }

    // Boundary problems stop the run before any record is touched
    let boundary = load_boundary(&args.boundary).context("Failed to read boundary")?;
    let prepared = prepare(&boundary).context("Unusable boundary geometry")?;

    let records =
        read_records_from_path(&args.points, delimiter).context("Failed to read points")?;

    let x_field = args
        .x_field
        .clone()
        .or(config.input.x_field.clone())
        .or_else(|| default_field(&records, 0))
        .context("Point file has no columns")?;
    let y_field = args
        .y_field
        .clone()
        .or(config.input.y_field.clone())
        .or_else(|| default_field(&records, 1))
        .context("Point file has no columns")?;

    let cancel = Arc::new(AtomicBool::new(false));
    if let Some(secs) = args.timeout_secs {
        let flag = Arc::clone(&cancel);
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(secs));
            flag.store(true, Ordering::Relaxed);
        });
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Classifying {} records...", records.len()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = Pipeline::new()
        .with_cancel_flag(cancel)
        .run_prepared(&records, &x_field, &y_field, &prepared);
    pb.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(GeosieveError::Cancelled) => {
            anyhow::bail!("Classification abandoned after {}s", args.timeout_secs.unwrap_or(0))
        }
        Err(e) => return Err(e).context("Classification failed"),
    };

    report(&outcome, config.output.preview_rows);

    if let Some(dir) = &config.output.dir {
        export::write_outcome(dir, &outcome, delimiter)?;
    }

    if let Outcome::NoUsableData { .. } = outcome {
        anyhow::bail!("No valid data found (check if all your data is 0,0 or invalid)");
    }

    Ok(())
}

/// Column at `position`, falling back to the first column
fn default_field(records: &RecordSet, position: usize) -> Option<String> {
    let names = records.header().names();
    names.get(position).or(names.first()).cloned()
}

fn report(outcome: &Outcome, preview_rows: usize) {
    let summary = outcome.summary();
    info!("Total rows: {}", summary.total);
    info!(
        "Valid: {} (inside {}, outside {}) | Zero (0,0): {} | Invalid: {}",
        summary.valid, summary.inside, summary.outside, summary.zero, summary.invalid
    );

    if let Some(bundle) = outcome.bundle() {
        if let Some((x, y)) = bundle.centroid() {
            info!("Center of valid points: ({:.6}, {:.6})", x, y);
        }
        preview("Outside", bundle.outside().map(|v| &v.record), preview_rows);
    }

    // Zero and invalid rows are shown even when nothing was usable
    preview("Zero coordinate", outcome.zero().iter(), preview_rows);
    preview("Invalid", outcome.invalid().iter(), preview_rows);

    if let Some(bundle) = outcome.bundle() {
        log_outside_share(bundle);
    }
}

fn preview<'a>(label: &str, rows: impl Iterator<Item = &'a Record>, limit: usize) {
    for record in rows.take(limit) {
        let row: Vec<&str> = record.fields().map(|(_, v)| v.unwrap_or("")).collect();
        info!("  {} row {}: {}", label, record.index(), row.join(" | "));
    }
}

fn log_outside_share(bundle: &ResultBundle) {
    let summary = bundle.summary();
    if summary.valid > 0 && summary.outside > 0 {
        let share = summary.outside as f64 / summary.valid as f64 * 100.0;
        warn!("{:.1}% of valid points fall outside the boundary", share);
    }
}
