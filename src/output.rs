//! Persistence of the cleaned dataset and the end-of-run summary.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::records::CleanRecord;

pub const CLEAN_DATA_FILE: &str = "covid_clean_data.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes the cleaned dataset as CSV to `path`, overwriting any existing
/// file at that location.
pub fn write_clean_csv(path: &Path, records: &[CleanRecord]) -> Result<(), ExportError> {
    debug!(path = %path.display(), rows = records.len(), "writing cleaned dataset");

    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Reads a previously exported dataset back into memory.
pub fn read_clean_csv(path: &Path) -> Result<Vec<CleanRecord>, ExportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Coverage of a cleaned dataset: how many rows and countries, over which
/// date range.
#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub countries: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

impl DatasetSummary {
    /// `None` for an empty dataset.
    pub fn from_records(records: &[CleanRecord]) -> Option<Self> {
        let first_date = records.iter().map(|r| r.date).min()?;
        let last_date = records.iter().map(|r| r.date).max()?;
        let countries = records
            .iter()
            .map(|r| r.location.as_str())
            .collect::<HashSet<_>>()
            .len();

        Some(DatasetSummary {
            rows: records.len(),
            countries,
            first_date,
            last_date,
        })
    }
}

/// Logs the dataset summary as pretty-printed JSON.
pub fn print_json(summary: &DatasetSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
