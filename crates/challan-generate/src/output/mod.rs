//! Flat-file persistence: full snapshots for batch mode, an append-only log
//! for live mode.

pub mod csv;
pub mod json;

use std::path::{Path, PathBuf};

use tracing::info;

use challan_core::{BATCH_COLUMNS, LIVE_COLUMNS, ViolationRecord};

use crate::errors::GenerationError;

use self::csv::{append_records_csv, write_records_csv};
use self::json::write_records_json;

pub const SNAPSHOT_JSON: &str = "violations_sample.json";
pub const SNAPSHOT_CSV: &str = "violations_sample.csv";

/// Files written by one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotReport {
    pub json_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
    pub records: usize,
}

/// Overwrites the JSON array and the CSV on every call.
///
/// An empty sequence still produces both files: `[]` and a header-only CSV.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSink {
    json_path: Option<PathBuf>,
    csv_path: Option<PathBuf>,
}

impl SnapshotSink {
    /// Sink writing the default file names under `dir`.
    pub fn in_dir(dir: &Path, json: bool, csv: bool) -> Self {
        Self {
            json_path: json.then(|| dir.join(SNAPSHOT_JSON)),
            csv_path: csv.then(|| dir.join(SNAPSHOT_CSV)),
        }
    }

    pub fn write(&self, records: &[ViolationRecord]) -> Result<SnapshotReport, GenerationError> {
        if let Some(path) = &self.json_path {
            write_records_json(path, records)?;
            info!(event = "snapshot_json_written", path = %path.display(), records = records.len());
        }
        if let Some(path) = &self.csv_path {
            let bytes = write_records_csv(path, &BATCH_COLUMNS, records)?;
            info!(event = "snapshot_csv_written", path = %path.display(), records = records.len(), bytes);
        }
        Ok(SnapshotReport {
            json_path: self.json_path.clone(),
            csv_path: self.csv_path.clone(),
            records: records.len(),
        })
    }
}

/// Append-only CSV with the live column order. The header is written once,
/// when the file does not yet exist.
#[derive(Debug, Clone)]
pub struct AppendSink {
    path: PathBuf,
    rows_appended: u64,
}

impl AppendSink {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, GenerationError> {
        let path = path.into();
        if !path.exists() {
            append_records_csv(&path, &LIVE_COLUMNS, &[])?;
            info!(event = "append_log_created", path = %path.display());
        }
        Ok(Self {
            path,
            rows_appended: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows appended through this handle.
    pub fn rows_appended(&self) -> u64 {
        self.rows_appended
    }

    pub fn append(&mut self, records: &[ViolationRecord]) -> Result<u64, GenerationError> {
        let bytes = append_records_csv(&self.path, &LIVE_COLUMNS, records)?;
        self.rows_appended += records.len() as u64;
        Ok(bytes)
    }
}
