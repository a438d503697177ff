// ABOUTME: Append-only JSONL registration log backing the EventLogStore contract.
// ABOUTME: Crash-safe fsynced append, full ordered scan, and repair for truncated files.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use eventday_core::{EventLogStore, Record, StoreError};
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur against the JSONL log file.
#[derive(Debug, Error)]
pub enum JsonlError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// An append-only registration log backed by a JSONL file: one serialized
/// `Record` per line. Appends serialize through an internal lock; scans read
/// the file fresh each time, so append order is scan order.
pub struct JsonlStore {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlStore {
    /// Open (or create) the log file at the given path, creating parent
    /// directories as needed. The file handle is held in append mode.
    pub fn open(path: &Path) -> Result<Self, JsonlError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    /// Returns the path to the underlying JSONL file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append_record(&self, record: &Record) -> Result<(), JsonlError> {
        let json = serde_json::to_string(record)?;
        let mut file = self.file.lock().await;
        writeln!(file, "{}", json)?;
        file.sync_all()?;
        Ok(())
    }

    fn scan_records(&self) -> Result<Vec<Record>, JsonlError> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: Record = serde_json::from_str(&line)?;
            records.push(record);
        }

        Ok(records)
    }

    /// Repair a log cut mid-append by keeping only complete, parseable lines
    /// and truncating any partial trailing data. Uses atomic temp-file +
    /// fsync + rename. Returns the count of records retained.
    pub fn repair(path: &Path) -> Result<usize, JsonlError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut valid_lines: Vec<String> = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if serde_json::from_str::<Record>(&line).is_ok() {
                valid_lines.push(line);
            }
        }

        let count = valid_lines.len();

        let tmp_path = path.with_extension("jsonl.tmp");
        let mut tmp_file = File::create(&tmp_path)?;
        for line in &valid_lines {
            writeln!(tmp_file, "{}", line)?;
        }
        tmp_file.sync_all()?;

        fs::rename(&tmp_path, path)?;

        // Fsync the parent directory so the rename itself is durable.
        // Best-effort: the rename already succeeded and the data is consistent.
        if let Some(parent) = path.parent()
            && let Ok(dir) = File::open(parent)
        {
            let _ = dir.sync_all();
        }

        Ok(count)
    }
}

#[async_trait]
impl EventLogStore for JsonlStore {
    async fn append(&self, record: &Record) -> Result<(), StoreError> {
        self.append_record(record).await.map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "append to registration log failed");
            StoreError::Unavailable(e.to_string())
        })
    }

    async fn scan(&self) -> Result<Vec<Record>, StoreError> {
        self.scan_records().map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "scan of registration log failed");
            StoreError::Unavailable(e.to_string())
        })
    }
}
