//! Evaluation metrics over batches of logits and labels.
//!
//! Metrics are stateless per-batch measures; accumulation across a run is the
//! caller's concern. Alongside plain accuracy, two deterministic baselines put
//! a trained model's number in context: the expected accuracy of uniform
//! random guessing and the accuracy of always predicting the most common
//! label.

use std::collections::HashMap;
use widedeep_layers::tensor::Tensor;

/// A stateless per-batch evaluation measure.
pub trait Metric {
    /// Returns the metric name used in reports and summaries.
    fn name(&self) -> &'static str;

    /// Measures one batch of logits `[batch, classes]` against its labels.
    fn measure(&self, logits: &Tensor, labels: &[usize]) -> f64;
}

/// Fraction of rows whose argmax matches the label.
#[derive(Debug, Default, Clone, Copy)]
pub struct Accuracy;

impl Accuracy {
    /// Creates the accuracy metric.
    pub fn new() -> Self {
        Self
    }
}

impl Metric for Accuracy {
    fn name(&self) -> &'static str {
        "accuracy"
    }

    fn measure(&self, logits: &Tensor, labels: &[usize]) -> f64 {
        if labels.is_empty() {
            return 0.0;
        }
        let predictions = logits.argmax_rows();
        let correct = predictions
            .iter()
            .zip(labels.iter())
            .filter(|(p, l)| p == l)
            .count();
        correct as f64 / labels.len() as f64
    }
}

/// Expected accuracy of guessing uniformly at random over the classes.
///
/// Ignores the batch entirely; the value is `1 / num_classes`.
#[derive(Debug, Clone, Copy)]
pub struct AccuracyRandom {
    /// Number of classes the classifier chooses between.
    num_classes: usize,
}

impl AccuracyRandom {
    /// Creates the random-guessing baseline for the given class count.
    pub fn new(num_classes: usize) -> Self {
        Self { num_classes }
    }
}

impl Metric for AccuracyRandom {
    fn name(&self) -> &'static str {
        "accuracy_baseline_random"
    }

    fn measure(&self, _logits: &Tensor, _labels: &[usize]) -> f64 {
        1.0 / self.num_classes as f64
    }
}

/// Accuracy of always predicting the most common label in the batch.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccuracyMode;

impl AccuracyMode {
    /// Creates the modal-label baseline.
    pub fn new() -> Self {
        Self
    }
}

impl Metric for AccuracyMode {
    fn name(&self) -> &'static str {
        "accuracy_baseline_mode"
    }

    fn measure(&self, _logits: &Tensor, labels: &[usize]) -> f64 {
        if labels.is_empty() {
            return 0.0;
        }
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for &label in labels {
            *counts.entry(label).or_insert(0) += 1;
        }
        let mode = counts.values().copied().max().unwrap_or(0);
        mode as f64 / labels.len() as f64
    }
}
