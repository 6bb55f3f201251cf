//! The joint classifier: several predictors voting through summed logits.
//!
//! [`JointClassifier`] owns one [`Predictor`] per selected spec. Training
//! forwards every predictor, sums their logits into one score per class,
//! and backpropagates the shared loss gradient into each of them, so each
//! predictor learns to correct the residual the others leave behind.

use crate::checkpoint::{
    latest_checkpoint, restore_checkpoint, CheckpointManager, CheckpointPayload, PredictorState,
};
use crate::error::{ModelError, ModelResult};
use crate::metrics::{Metrics, MetricsRecorder};
use crate::predictor::Predictor;
use crate::spec::ModelSpec;
use crate::summary::{SummaryRow, SummaryWriter};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};
use widedeep_data::{DataMode, DataSettings};
use widedeep_layers::{Regularizer, Tensor};
use widedeep_ops::{Loss, Metric};

/// Options for a training run.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Number of optimization steps.
    pub steps: u64,
    /// Examples per batch.
    pub batch_size: usize,
    /// Append a summary row every N steps.
    pub track_summaries: u64,
    /// Write a checkpoint every N steps.
    pub track_models: u64,
}

impl TrainOptions {
    /// Creates options with the default summary and checkpoint cadences.
    pub fn new(steps: u64, batch_size: usize) -> Self {
        Self {
            steps,
            batch_size,
            track_summaries: 50,
            track_models: 100,
        }
    }

    /// Sets the summary cadence.
    pub fn with_track_summaries(mut self, every_n_steps: u64) -> Self {
        self.track_summaries = every_n_steps;
        self
    }

    /// Sets the checkpoint cadence.
    pub fn with_track_models(mut self, every_n_steps: u64) -> Self {
        self.track_models = every_n_steps;
        self
    }
}

/// Options for an evaluation run.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Examples per batch.
    pub batch_size: usize,
    /// Which split to evaluate.
    pub data_mode: DataMode,
}

impl EvalOptions {
    /// Creates options evaluating the test split.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            data_mode: DataMode::Test,
        }
    }

    /// Sets the split to evaluate.
    pub fn with_data_mode(mut self, data_mode: DataMode) -> Self {
        self.data_mode = data_mode;
        self
    }
}

/// Result of a training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// Global step after the final update.
    pub final_step: u64,
    /// Loss of the final step, including any regularization penalty.
    pub final_loss: f64,
    /// Example-weighted metric averages over the whole run.
    pub averages: Metrics,
}

/// Result of an evaluation run.
#[derive(Debug, Clone)]
pub struct EvalReport {
    /// Global step the evaluated parameters belong to.
    pub global_step: u64,
    /// Number of examples evaluated.
    pub examples: u64,
    /// Example-weighted loss and metric averages.
    pub metrics: Metrics,
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {}, {} examples: loss = {:.6}",
            self.global_step, self.examples, self.metrics.loss
        )?;
        for (name, value) in self.metrics.values() {
            write!(f, ", {} = {:.4}", name, value)?;
        }
        Ok(())
    }
}

/// Validates the accelerator memory fraction hint and logs it.
///
/// The value is a passthrough hint only; no device memory is allocated.
///
/// # Errors
///
/// Returns a [`ModelError::ConfigError`] unless `gpu_frac` is in (0, 1].
pub fn apply_gpu_fraction(gpu_frac: f32) -> ModelResult<()> {
    if !(gpu_frac > 0.0 && gpu_frac <= 1.0) {
        return Err(ModelError::ConfigError {
            message: format!("gpu_frac must be in (0, 1], got {}", gpu_frac),
        });
    }
    info!("Using accelerator memory fraction {:.2}", gpu_frac);
    Ok(())
}

/// A classifier that sums the logits of one or more predictors.
pub struct JointClassifier {
    num_classes: usize,
    predictors: Vec<Predictor>,
    loss: Box<dyn Loss>,
    clip_gradient: Option<f32>,
    global_step: u64,
    checkpoints: CheckpointManager,
    summaries: SummaryWriter,
}

impl std::fmt::Debug for JointClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JointClassifier")
            .field("num_classes", &self.num_classes)
            .field("global_step", &self.global_step)
            .finish_non_exhaustive()
    }
}

impl JointClassifier {
    /// Builds one predictor per spec with logit width `outputs`.
    ///
    /// L1 and L2 coefficients apply jointly to the weights of every
    /// predictor. An unset coefficient disables that penalty; an unset
    /// `gradient_clip` disables clipping.
    ///
    /// # Errors
    ///
    /// Returns an error if `specs` is empty, predictor names collide,
    /// `outputs` is zero, the clip threshold is not positive, or a
    /// predictor cannot be built.
    pub fn new(
        model_dir: impl Into<PathBuf>,
        outputs: usize,
        specs: Vec<ModelSpec>,
        l1_regularization: Option<f32>,
        l2_regularization: Option<f32>,
        loss: Box<dyn Loss>,
        gradient_clip: Option<f32>,
    ) -> ModelResult<Self> {
        if specs.is_empty() {
            return Err(ModelError::NoPredictors);
        }
        if outputs == 0 {
            return Err(ModelError::ConfigError {
                message: "output width must be positive".to_string(),
            });
        }
        for (i, spec) in specs.iter().enumerate() {
            if specs.iter().skip(i + 1).any(|s| s.name() == spec.name()) {
                return Err(ModelError::ConfigError {
                    message: format!("duplicate predictor name {:?}", spec.name()),
                });
            }
        }
        if let Some(clip) = gradient_clip {
            if !(clip > 0.0) {
                return Err(ModelError::ConfigError {
                    message: format!("gradient clip must be positive, got {}", clip),
                });
            }
        }

        let regularizer = Regularizer::from_coeffs(l1_regularization, l2_regularization);
        let predictors = specs
            .iter()
            .map(|spec| Predictor::from_spec(spec, outputs, regularizer))
            .collect::<ModelResult<Vec<_>>>()?;

        let model_dir = model_dir.into();
        Ok(Self {
            num_classes: outputs,
            predictors,
            loss,
            clip_gradient: gradient_clip,
            global_step: 0,
            checkpoints: CheckpointManager::new(&model_dir),
            summaries: SummaryWriter::new(&model_dir),
        })
    }

    /// Returns the logit width.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Returns the current global step.
    pub fn global_step(&self) -> u64 {
        self.global_step
    }

    /// Returns the predictor names in construction order.
    pub fn predictor_names(&self) -> Vec<&str> {
        self.predictors.iter().map(|p| p.name()).collect()
    }

    /// Trains for `options.steps` steps, cycling data passes as batches
    /// run out.
    ///
    /// Every `track_summaries` steps a summary row is appended; every
    /// `track_models` steps a checkpoint is written, plus a final one when
    /// training ends.
    pub fn train(
        &mut self,
        data: &dyn DataSettings,
        options: &TrainOptions,
        metrics: &[Box<dyn Metric>],
    ) -> ModelResult<TrainReport> {
        let track_summaries = options.track_summaries.max(1);
        let track_models = options.track_models.max(1);

        let mut pass: u64 = 0;
        let mut batches = data.batches(DataMode::Train, options.batch_size, pass)?;
        if batches.is_empty() {
            return Err(ModelError::ConfigError {
                message: "training split produced no batches".to_string(),
            });
        }
        let mut batch_index = 0usize;

        info!(
            "Starting training for {} steps with {} predictors (batch size {})",
            options.steps,
            self.predictors.len(),
            options.batch_size
        );

        let mut recorder = MetricsRecorder::new();
        let mut final_loss = 0.0f64;

        for _ in 0..options.steps {
            if batch_index >= batches.len() {
                pass += 1;
                batches = data.batches(DataMode::Train, options.batch_size, pass)?;
                batch_index = 0;
            }
            let batch = &batches[batch_index];
            batch_index += 1;

            let step = self.global_step;
            let logits = self.forward_train(batch.features())?;
            let data_loss = self.loss.forward(&logits, batch.labels())?;
            let loss_value = (data_loss + self.regularization_loss()) as f64;
            final_loss = loss_value;

            let grad = self.loss.grad()?;
            for predictor in &mut self.predictors {
                predictor.backward(&grad)?;
            }
            self.clip_gradients();
            for predictor in &mut self.predictors {
                predictor.apply_gradients(step);
            }

            let mut batch_metrics = Metrics::new(loss_value, step);
            for metric in metrics {
                batch_metrics =
                    batch_metrics.with_value(metric.name(), metric.measure(&logits, batch.labels()));
            }
            recorder.record(&batch_metrics, batch.len() as u64);

            if step == 0 || step % track_summaries == 0 {
                info!("Step {}: loss = {:.6}", step, loss_value);
            }
            if step > 0 && step % track_summaries == 0 {
                self.summaries
                    .append(&self.summary_row(step, loss_value, &batch_metrics))?;
            }
            if step > 0 && step % track_models == 0 {
                self.save_checkpoint()?;
            }

            self.global_step += 1;
        }

        self.save_checkpoint()?;
        info!("Training finished at step {}", self.global_step);

        Ok(TrainReport {
            final_step: self.global_step,
            final_loss,
            averages: recorder.aggregate(self.global_step),
        })
    }

    /// Evaluates one pass over the selected split without updates.
    ///
    /// Restores the latest checkpoint under the model directory first; when
    /// none exists, evaluation proceeds on freshly initialized parameters
    /// with a warning.
    pub fn evaluate(
        &mut self,
        data: &dyn DataSettings,
        options: &EvalOptions,
        metrics: &[Box<dyn Metric>],
    ) -> ModelResult<EvalReport> {
        match latest_checkpoint(self.checkpoints.model_dir())? {
            Some(path) => {
                let payload = restore_checkpoint(&path)?;
                self.restore_payload(payload)?;
                info!(
                    "Restored checkpoint {:?} at step {}",
                    path, self.global_step
                );
            }
            None => {
                warn!(
                    "No checkpoint found in {:?}, evaluating freshly initialized parameters",
                    self.checkpoints.model_dir()
                );
            }
        }

        let batches = data.batches(options.data_mode, options.batch_size, 0)?;
        let mut recorder = MetricsRecorder::new();
        for batch in &batches {
            let logits = self.forward(batch.features())?;
            let loss_value = self.loss.forward(&logits, batch.labels())? as f64;

            let mut batch_metrics = Metrics::new(loss_value, self.global_step);
            for metric in metrics {
                batch_metrics =
                    batch_metrics.with_value(metric.name(), metric.measure(&logits, batch.labels()));
            }
            recorder.record(&batch_metrics, batch.len() as u64);
        }

        let report = EvalReport {
            global_step: self.global_step,
            examples: recorder.examples(),
            metrics: recorder.aggregate(self.global_step),
        };
        info!("Evaluation complete: loss = {:.6}", report.metrics.loss);
        Ok(report)
    }

    fn forward(&self, features: &Tensor) -> ModelResult<Tensor> {
        let mut summed: Option<Tensor> = None;
        for predictor in &self.predictors {
            let logits = predictor.forward(features)?;
            summed = Some(match summed {
                Some(acc) => acc.add(&logits),
                None => logits,
            });
        }
        summed.ok_or(ModelError::NoPredictors)
    }

    fn forward_train(&mut self, features: &Tensor) -> ModelResult<Tensor> {
        let mut summed: Option<Tensor> = None;
        for predictor in &mut self.predictors {
            let logits = predictor.forward_train(features)?;
            summed = Some(match summed {
                Some(acc) => acc.add(&logits),
                None => logits,
            });
        }
        summed.ok_or(ModelError::NoPredictors)
    }

    fn regularization_loss(&self) -> f32 {
        self.predictors
            .iter()
            .map(|p| p.regularization_loss())
            .sum()
    }

    /// Rescales every gradient by `clip / norm` when the global norm
    /// exceeds the threshold.
    fn clip_gradients(&mut self) {
        let clip = match self.clip_gradient {
            Some(clip) => clip,
            None => return,
        };

        let mut sum_sq = 0.0f64;
        for predictor in &self.predictors {
            for grad in predictor.gradients() {
                sum_sq += grad.data().iter().map(|&v| (v as f64) * (v as f64)).sum::<f64>();
            }
        }
        let norm = sum_sq.sqrt() as f32;

        if norm > clip {
            let scale = clip / norm;
            for predictor in &mut self.predictors {
                for (_, grad) in predictor.params_and_grads() {
                    for value in grad.data_mut() {
                        *value *= scale;
                    }
                }
            }
        }
    }

    fn summary_row(&self, step: u64, loss: f64, metrics: &Metrics) -> SummaryRow {
        let mut learning_rates = BTreeMap::new();
        for predictor in &self.predictors {
            learning_rates.insert(
                predictor.name().to_string(),
                predictor.learning_rate_at(step) as f64,
            );
        }
        let mut metric_values = BTreeMap::new();
        for (name, value) in metrics.values() {
            metric_values.insert(name.clone(), *value);
        }
        SummaryRow {
            step,
            loss,
            learning_rates,
            metrics: metric_values,
        }
    }

    fn save_checkpoint(&mut self) -> ModelResult<()> {
        let payload = CheckpointPayload {
            global_step: self.global_step,
            predictors: self
                .predictors
                .iter()
                .map(|p| PredictorState {
                    name: p.name().to_string(),
                    parameters: p.parameters().into_iter().cloned().collect(),
                })
                .collect(),
        };
        self.checkpoints.save(&payload)?;
        Ok(())
    }

    fn restore_payload(&mut self, payload: CheckpointPayload) -> ModelResult<()> {
        if payload.predictors.len() != self.predictors.len() {
            return Err(ModelError::CheckpointMismatch {
                message: format!(
                    "checkpoint carries {} predictors, model has {}",
                    payload.predictors.len(),
                    self.predictors.len()
                ),
            });
        }
        for state in &payload.predictors {
            let predictor = self
                .predictors
                .iter_mut()
                .find(|p| p.name() == state.name)
                .ok_or_else(|| ModelError::CheckpointMismatch {
                    message: format!("checkpoint predictor {:?} not present in model", state.name),
                })?;
            predictor.set_parameters(&state.parameters)?;
        }
        self.global_step = payload.global_step;
        Ok(())
    }
}
