//! A mini-batch of normalized features and quantized labels.

use widedeep_layers::tensor::Tensor;

/// One mini-batch: a `[n, features]` tensor plus `n` class labels.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Normalized feature rows.
    features: Tensor,
    /// Quantized class label per row.
    labels: Vec<usize>,
}

impl Batch {
    /// Creates a batch from features and labels.
    ///
    /// # Panics
    ///
    /// Panics if the number of feature rows differs from the label count
    pub fn new(features: Tensor, labels: Vec<usize>) -> Self {
        assert_eq!(
            features.shape()[0],
            labels.len(),
            "Batch has {} feature rows but {} labels",
            features.shape()[0],
            labels.len()
        );
        Self { features, labels }
    }

    /// Returns the number of examples in this batch.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if this batch contains no examples.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the feature tensor.
    pub fn features(&self) -> &Tensor {
        &self.features
    }

    /// Returns the labels.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_accessors() {
        let features = Tensor::from_data(&[2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let batch = Batch::new(features, vec![0, 1]);

        assert_eq!(batch.len(), 2);
        assert!(!batch.is_empty());
        assert_eq!(batch.features().shape(), &[2, 3]);
        assert_eq!(batch.labels(), &[0, 1]);
    }

    #[test]
    #[should_panic(expected = "feature rows")]
    fn test_batch_row_label_mismatch() {
        let features = Tensor::zeros(&[2, 3]);
        Batch::new(features, vec![0]);
    }
}
