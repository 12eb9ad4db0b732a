// phiscrub-core/src/audit.rs
//! Structured audit logging for scan events.
//!
//! Every record references the matched value by canonical hash only; the
//! matched text itself never reaches the log file. Records are appended as
//! one JSON object per line so downstream tooling can tail and parse them
//! incrementally.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::PhiCategory;
use crate::scan_match::{canonical_sample_hash, ScanResult};

/// A single, auditable log entry for one detected match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub timestamp: String,
    pub run_id: String,
    pub source_id: String,
    pub category: PhiCategory,
    pub pattern_name: String,
    pub start: usize,
    pub end: usize,
    pub confidence: f64,
    /// Canonical hash of the matched value; the value itself is never logged.
    pub sample_hash: String,
}

/// Append-only JSONL audit log.
#[derive(Debug)]
pub struct ScanAuditLog {
    path: PathBuf,
    file: File,
}

impl ScanAuditLog {
    /// Opens (creating if needed) an audit log at `path` for appending.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open audit log {}", path.display()))?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a single record as one JSON line.
    pub fn append(&mut self, record: &ScanRecord) -> Result<()> {
        let line = serde_json::to_string(record).context("Failed to serialize audit record")?;
        writeln!(self.file, "{line}")
            .with_context(|| format!("Failed to write audit log {}", self.path.display()))?;
        Ok(())
    }

    /// Records every match of a scan under a fresh run id, which is returned
    /// so callers can correlate the batch.
    pub fn record_result(&mut self, source_id: &str, result: &ScanResult) -> Result<String> {
        let run_id = Uuid::new_v4().to_string();
        let timestamp = Utc::now().to_rfc3339();

        for m in &result.matches {
            self.append(&ScanRecord {
                timestamp: timestamp.clone(),
                run_id: run_id.clone(),
                source_id: source_id.to_string(),
                category: m.category,
                pattern_name: m.pattern_name.clone(),
                start: m.start,
                end: m.end,
                confidence: m.confidence,
                sample_hash: canonical_sample_hash(&m.pattern_name, &m.matched_text),
            })?;
        }

        Ok(run_id)
    }
}
