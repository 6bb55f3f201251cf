//! Target quantization into discrete class buckets.

use crate::error::{DataError, DataResult};
use serde::{Deserialize, Serialize};

/// Maps a continuous target into class buckets using fixed edge values.
///
/// A value lands in the bucket of the first edge it is below; values at or
/// above the last edge land in the final bucket, so `edges.len() + 1` classes
/// cover the whole real line.
///
/// # Example
///
/// ```
/// use widedeep_data::Quantize;
///
/// let quantizer = Quantize::new(vec![20.0, 40.0, 60.0], 32);
/// assert_eq!(quantizer.num_classes(), 4);
/// assert_eq!(quantizer.bucketize(15.0), 0);
/// assert_eq!(quantizer.bucketize(45.0), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantize {
    /// Bucket edges in strictly increasing order.
    edges: Vec<f32>,
    /// Batch size the dataset serves labels with.
    batch_size: usize,
}

impl Quantize {
    /// Creates a quantizer from bucket edges and a batch size.
    ///
    /// Call [`validate`](Self::validate) before use; construction itself
    /// does not check the edges.
    pub fn new(edges: Vec<f32>, batch_size: usize) -> Self {
        Self { edges, batch_size }
    }

    /// Checks that the edges are non-empty and strictly increasing and that
    /// the batch size is positive.
    pub fn validate(&self) -> DataResult<()> {
        if self.edges.is_empty() {
            return Err(DataError::ConfigError {
                message: "quantizer requires at least one edge".to_string(),
            });
        }
        for window in self.edges.windows(2) {
            if window[1] <= window[0] {
                return Err(DataError::ConfigError {
                    message: format!(
                        "quantizer edges must be strictly increasing, got {} then {}",
                        window[0], window[1]
                    ),
                });
            }
        }
        if self.batch_size == 0 {
            return Err(DataError::ConfigError {
                message: "batch_size must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the number of classes the quantizer produces.
    pub fn num_classes(&self) -> usize {
        self.edges.len() + 1
    }

    /// Returns the class bucket for a target value.
    pub fn bucketize(&self, value: f32) -> usize {
        self.edges
            .iter()
            .position(|&edge| value < edge)
            .unwrap_or(self.edges.len())
    }

    /// Returns the bucket edges.
    pub fn edges(&self) -> &[f32] {
        &self.edges
    }

    /// Returns the configured batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}
