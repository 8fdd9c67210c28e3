//! Durable batch progress checkpoint.
//!
//! A single JSON record under the output root, read once at startup and
//! rewritten after every unit. Writes go through a temp-file-then-rename
//! sequence so an abrupt termination can never leave a truncated record.
//! Concurrent orchestrator instances against one output directory are
//! unsupported; the single-writer assumption belongs to the caller.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the progress record under the output root
pub const PROGRESS_FILE: &str = "batch_progress.json";

/// Errors while reading or writing the checkpoint
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The persisted batch state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Cursor over attempted ordinals (monotonic, never exceeds total)
    pub processed_questions: usize,

    /// Number of candidate blocks discovered in the corpus
    pub total_questions: usize,

    /// Ordinals whose unit failed, in ascending order
    pub failed_questions: Vec<usize>,

    /// Batches completed so far
    pub completed_batches: usize,

    /// When the first run against this output directory started
    pub start_time: Option<DateTime<Utc>>,

    /// When the most recent batch finished
    pub last_batch_time: Option<DateTime<Utc>>,

    /// SHA-256 of the corpus at first run, used to warn on mutation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corpus_digest: Option<String>,
}

impl ProgressRecord {
    /// Fresh record for a new run
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed ordinal, keeping the set ordered and free of
    /// duplicates
    pub fn record_failure(&mut self, ordinal: usize) {
        if let Err(pos) = self.failed_questions.binary_search(&ordinal) {
            self.failed_questions.insert(pos, ordinal);
        }
    }
}

/// Reads and atomically writes the progress record
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// Create a store for the given output directory
    pub fn new(output_dir: &Path) -> Self {
        Self {
            path: output_dir.join(PROGRESS_FILE),
        }
    }

    /// Path of the underlying record file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record, or `None` when no checkpoint exists yet
    pub async fn load(&self) -> Result<Option<ProgressRecord>, ProgressError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Persist the record via write-temporary-then-rename
    pub async fn save(&self, record: &ProgressRecord) -> Result<(), ProgressError> {
        let json = serde_json::to_string_pretty(record)?;
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }

    /// Remove the record after full completion
    pub async fn clear(&self) -> Result<(), ProgressError> {
        if self.path.exists() {
            tokio::fs::remove_file(&self.path).await?;
        }
        Ok(())
    }
}
