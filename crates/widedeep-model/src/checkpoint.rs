//! Checkpoint persistence for the joint classifier.
//!
//! Each checkpoint is a `model.ckpt-{step}.json` file holding every parameter
//! tensor of every predictor. A `checkpoint` state file alongside them names
//! the latest checkpoint and the full retained history, so a later process
//! can find the newest checkpoint without scanning the directory.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use widedeep_layers::Tensor;

/// Name of the state file tracking checkpoint history.
const STATE_FILE: &str = "checkpoint";

/// Default number of checkpoints retained.
const DEFAULT_MAX_TO_KEEP: usize = 5;

/// Returns the checkpoint file name for a global step.
pub fn checkpoint_filename(step: u64) -> String {
    format!("model.ckpt-{}.json", step)
}

/// Parameter tensors of one predictor, keyed by predictor name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorState {
    /// Predictor name, matched against the live model on restore.
    pub name: String,
    /// Parameter tensors in layer order.
    pub parameters: Vec<Tensor>,
}

/// Everything a checkpoint persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointPayload {
    /// Global step the checkpoint was taken at.
    pub global_step: u64,
    /// Per-predictor parameter tensors.
    pub predictors: Vec<PredictorState>,
}

/// Parsed contents of the `checkpoint` state file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointState {
    /// File name of the newest checkpoint.
    pub model_checkpoint_path: String,
    /// File names of all retained checkpoints, oldest first.
    pub all_model_checkpoint_paths: Vec<String>,
}

fn parse_state(input: &str) -> Option<CheckpointState> {
    let mut model_checkpoint_path: Option<String> = None;
    let mut all: Vec<String> = Vec::new();

    for line in input.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.is_empty() {
            continue;
        }
        let (key, value) = match line.split_once(':') {
            Some(kv) => kv,
            None => continue,
        };
        let key = key.trim();
        let mut value = value.trim().to_string();
        if (value.starts_with('\'') && value.ends_with('\''))
            || (value.starts_with('"') && value.ends_with('"'))
        {
            value = value[1..value.len() - 1].to_string();
        }
        match key {
            "model_checkpoint_path" => model_checkpoint_path = Some(value),
            "all_model_checkpoint_paths" => all.push(value),
            _ => {}
        }
    }

    model_checkpoint_path.map(|path| CheckpointState {
        model_checkpoint_path: path,
        all_model_checkpoint_paths: all,
    })
}

fn render_state(state: &CheckpointState) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "model_checkpoint_path: \"{}\"\n",
        state.model_checkpoint_path
    ));
    for path in &state.all_model_checkpoint_paths {
        out.push_str(&format!("all_model_checkpoint_paths: \"{}\"\n", path));
    }
    out
}

/// Returns the path of the newest checkpoint named by the state file, or
/// `None` when the directory holds no usable state file.
pub fn latest_checkpoint(dir: &Path) -> ModelResult<Option<PathBuf>> {
    let state_path = dir.join(STATE_FILE);
    if !state_path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(&state_path)?;
    Ok(parse_state(&contents).map(|state| dir.join(state.model_checkpoint_path)))
}

/// Reads a checkpoint payload back from disk.
pub fn restore_checkpoint(path: &Path) -> ModelResult<CheckpointPayload> {
    if !path.exists() {
        return Err(ModelError::CheckpointNotFound(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Writes checkpoints, maintains the state file, and prunes old files.
pub struct CheckpointManager {
    model_dir: PathBuf,
    max_to_keep: usize,
    saved: VecDeque<PathBuf>,
}

impl CheckpointManager {
    /// Creates a manager writing into `model_dir`, keeping the default of
    /// five checkpoints.
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            max_to_keep: DEFAULT_MAX_TO_KEEP,
            saved: VecDeque::new(),
        }
    }

    /// Sets the number of checkpoints retained. Zero keeps all of them.
    pub fn with_max_to_keep(mut self, max_to_keep: usize) -> Self {
        self.max_to_keep = max_to_keep;
        self
    }

    /// Returns the directory checkpoints are written to.
    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Writes a checkpoint, updates the state file, and prunes history.
    pub fn save(&mut self, payload: &CheckpointPayload) -> ModelResult<PathBuf> {
        fs::create_dir_all(&self.model_dir)?;
        let path = self.model_dir.join(checkpoint_filename(payload.global_step));
        fs::write(&path, serde_json::to_string(payload)?)?;
        self.saved.push_back(path.clone());
        self.prune()?;
        self.write_state()?;

        info!(
            "Saved checkpoint at step {} to {:?}",
            payload.global_step, path
        );
        Ok(path)
    }

    fn prune(&mut self) -> ModelResult<()> {
        if self.max_to_keep == 0 {
            return Ok(());
        }
        while self.saved.len() > self.max_to_keep {
            if let Some(path) = self.saved.pop_front() {
                match fs::remove_file(&path) {
                    Ok(()) => {
                        info!("Removed old checkpoint {:?}", path);
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(ModelError::Io(e)),
                }
            }
        }
        Ok(())
    }

    fn write_state(&self) -> ModelResult<()> {
        let newest = match self.saved.back() {
            Some(path) => path,
            None => return Ok(()),
        };
        let basename = |path: &PathBuf| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        let state = CheckpointState {
            model_checkpoint_path: basename(newest),
            all_model_checkpoint_paths: self.saved.iter().map(basename).collect(),
        };
        fs::write(self.model_dir.join(STATE_FILE), render_state(&state))?;
        Ok(())
    }
}
