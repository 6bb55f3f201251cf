//! Metric containers and aggregation across batches.
//!
//! [`Metrics`] carries the loss and named metric values measured on one
//! batch; [`MetricsRecorder`] accumulates them weighted by example count, so
//! a short final batch does not skew the averages.

use serde::{Deserialize, Serialize};

/// Loss and named metric values for a single batch or an aggregate.
///
/// Named values keep insertion order, so a report renders metrics in the
/// order they were measured.
///
/// # Examples
///
/// ```
/// use widedeep_model::metrics::Metrics;
///
/// let metrics = Metrics::new(0.693, 100)
///     .with_value("accuracy", 0.5)
///     .with_value("accuracy_baseline_random", 0.25);
///
/// assert_eq!(metrics.value("accuracy"), Some(0.5));
/// assert_eq!(metrics.values().len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    /// Loss value.
    pub loss: f64,
    /// Named metric values in insertion order.
    values: Vec<(String, f64)>,
    /// Global step these metrics belong to.
    pub global_step: u64,
}

impl Metrics {
    /// Creates metrics with the given loss and step.
    pub fn new(loss: f64, global_step: u64) -> Self {
        Self {
            loss,
            values: Vec::new(),
            global_step,
        }
    }

    /// Appends a named metric value.
    pub fn with_value(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.push((name.into(), value));
        self
    }

    /// Looks up a named metric value.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Returns the named values in insertion order.
    pub fn values(&self) -> &[(String, f64)] {
        &self.values
    }
}

/// Accumulates batch metrics into example-weighted averages.
///
/// # Examples
///
/// ```
/// use widedeep_model::metrics::{Metrics, MetricsRecorder};
///
/// let mut recorder = MetricsRecorder::new();
/// recorder.record(&Metrics::new(1.0, 0).with_value("accuracy", 1.0), 3);
/// recorder.record(&Metrics::new(0.0, 1).with_value("accuracy", 0.0), 1);
///
/// assert!((recorder.average_loss() - 0.75).abs() < 1e-12);
/// assert_eq!(recorder.average_value("accuracy"), Some(0.75));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder {
    loss_sum: f64,
    value_sums: Vec<(String, f64)>,
    examples: u64,
}

impl MetricsRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one batch of metrics weighted by its example count.
    ///
    /// Every record is expected to carry the same named metrics; a name
    /// first seen mid-stream is averaged over the full example count.
    pub fn record(&mut self, metrics: &Metrics, examples: u64) {
        let weight = examples as f64;
        self.loss_sum += metrics.loss * weight;
        for (name, value) in metrics.values() {
            match self.value_sums.iter_mut().find(|(n, _)| n == name) {
                Some((_, sum)) => *sum += value * weight,
                None => self.value_sums.push((name.clone(), value * weight)),
            }
        }
        self.examples += examples;
    }

    /// Returns the total number of examples recorded.
    pub fn examples(&self) -> u64 {
        self.examples
    }

    /// Returns the example-weighted average loss, or 0.0 if nothing was
    /// recorded.
    pub fn average_loss(&self) -> f64 {
        if self.examples == 0 {
            0.0
        } else {
            self.loss_sum / self.examples as f64
        }
    }

    /// Returns the example-weighted average for a named metric.
    pub fn average_value(&self, name: &str) -> Option<f64> {
        if self.examples == 0 {
            return None;
        }
        self.value_sums
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, sum)| sum / self.examples as f64)
    }

    /// Collapses the recorded batches into a single [`Metrics`] at
    /// `global_step`, preserving the order metrics were first recorded.
    pub fn aggregate(&self, global_step: u64) -> Metrics {
        let mut metrics = Metrics::new(self.average_loss(), global_step);
        if self.examples > 0 {
            for (name, sum) in &self.value_sums {
                metrics = metrics.with_value(name.clone(), sum / self.examples as f64);
            }
        }
        metrics
    }

    /// Clears all recorded values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
