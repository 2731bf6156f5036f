//! Delimited-text record source.
//!
//! Reads every column as raw text; numeric interpretation happens later in
//! the cleaning stage.

mod delimiter;

pub use delimiter::Delimiter;

use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;
use xxhash_rust::xxh64::xxh64;

use crate::error::Result;
use crate::models::RecordSet;

/// Read records from delimited text with a header row
pub fn read_records<R: Read>(reader: R, delimiter: Delimiter) -> Result<RecordSet> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter.as_byte())
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    Ok(RecordSet::from_rows(headers, rows))
}

/// Read records from a file; `.gz` files are decompressed on the fly
pub fn read_records_from_path(path: &Path, delimiter: Delimiter) -> Result<RecordSet> {
    info!("Loading records from {}", path.display());

    let file = File::open(path)?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let records = read_records(reader, delimiter)?;
    info!(
        "Loaded {} records with {} columns",
        records.len(),
        records.header().len()
    );
    Ok(records)
}

/// Content fingerprint for detecting a changed input
pub fn fingerprint(bytes: &[u8]) -> u64 {
    xxh64(bytes, 0)
}
