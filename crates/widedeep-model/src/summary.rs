//! JSONL training summaries.
//!
//! Training appends one [`SummaryRow`] per summary cadence to
//! `summaries.jsonl` under the model directory, one JSON object per line so
//! the file can be tailed while a run is in flight.

use crate::error::ModelResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the summary file under the model directory.
const SUMMARY_FILE: &str = "summaries.jsonl";

/// One summary line: the step, the training loss, the learning rate each
/// predictor used, and the metric values measured on that step's batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Global step.
    pub step: u64,
    /// Training loss including any regularization penalty.
    pub loss: f64,
    /// Learning rate per predictor name.
    pub learning_rates: BTreeMap<String, f64>,
    /// Metric values per metric name.
    pub metrics: BTreeMap<String, f64>,
}

/// Appends summary rows to `summaries.jsonl`.
pub struct SummaryWriter {
    path: PathBuf,
}

impl SummaryWriter {
    /// Creates a writer targeting `model_dir/summaries.jsonl`.
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: model_dir.into().join(SUMMARY_FILE),
        }
    }

    /// Returns the summary file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row as a JSON line, creating the file on first use.
    pub fn append(&self, row: &SummaryRow) -> ModelResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut line = serde_json::to_string(row)?;
        line.push('\n');
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}
