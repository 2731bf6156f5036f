//! Partition export: one delimited file per partition plus a JSON summary.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

use geosieve::models::{Header, Outcome, Record, ResultBundle, Summary, ValidRecord};
use geosieve::source::Delimiter;

const STATUS_COLUMN: &str = "location_status";

#[derive(Serialize)]
struct SummaryDocument {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    center: Option<[f64; 2]>,
    no_usable_data: bool,
}

/// Write every non-empty partition and the summary into `dir`
pub fn write_outcome(dir: &Path, outcome: &Outcome, delimiter: Delimiter) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).context("Failed to create output directory")?;

    let mut written = Vec::new();
    if let Some(header) = first_header(outcome) {
        written.extend(write_partitions(dir, outcome, header, delimiter)?);
    }

    let path = dir.join("summary.json");
    let document = SummaryDocument {
        generated_at: Utc::now(),
        summary: outcome.summary(),
        center: outcome.bundle().and_then(ResultBundle::centroid).map(|(x, y)| [x, y]),
        no_usable_data: outcome.bundle().is_none(),
    };
    let file = File::create(&path).context("Failed to create summary file")?;
    serde_json::to_writer_pretty(file, &document)?;
    written.push(path);

    for path in &written {
        info!("Wrote {}", path.display());
    }
    Ok(written)
}

/// Header shared by every record of the run, if there is any record at all
fn first_header(outcome: &Outcome) -> Option<&Header> {
    outcome
        .bundle()
        .and_then(|bundle| bundle.valid.first())
        .map(|v| &v.record)
        .or_else(|| outcome.zero().first())
        .or_else(|| outcome.invalid().first())
        .map(Record::header)
}

fn write_partitions(
    dir: &Path,
    outcome: &Outcome,
    header: &Header,
    delimiter: Delimiter,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    // Inside/outside files are always written for a classified run, even when empty
    if let Some(bundle) = outcome.bundle() {
        let inside: Vec<&ValidRecord> = bundle.inside().collect();
        let outside: Vec<&ValidRecord> = bundle.outside().collect();
        for (name, rows) in [("inside_points.csv", inside), ("outside_points.csv", outside)] {
            let path = dir.join(name);
            write_valid(&path, header, &rows, delimiter)?;
            written.push(path);
        }
    }

    for (name, rows) in [
        ("zero_coordinate_rows.csv", outcome.zero()),
        ("invalid_rows.csv", outcome.invalid()),
    ] {
        if rows.is_empty() {
            continue;
        }
        let path = dir.join(name);
        write_records(&path, header, rows, delimiter)?;
        written.push(path);
    }

    Ok(written)
}

fn write_valid(
    path: &Path,
    header: &Header,
    rows: &[&ValidRecord],
    delimiter: Delimiter,
) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(
        header
            .names()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(STATUS_COLUMN)),
    )?;

    for row in rows {
        let status = row.status.to_string();
        writer.write_record(
            padded(&row.record)
                .into_iter()
                .chain(std::iter::once(status.as_str())),
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn write_records(path: &Path, header: &Header, rows: &[Record], delimiter: Delimiter) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(header.names())?;
    for row in rows {
        writer.write_record(padded(row))?;
    }
    writer.flush()?;
    Ok(())
}

/// Row values aligned to the header; short rows are padded with empty fields
fn padded(record: &Record) -> Vec<&str> {
    record.fields().map(|(_, value)| value.unwrap_or("")).collect()
}
