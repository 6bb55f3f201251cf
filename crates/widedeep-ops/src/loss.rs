//! Loss functions for classifier training.

use crate::error::{OpsError, OpsResult};
use widedeep_layers::tensor::Tensor;

/// A differentiable loss over a batch of logits and integer class labels.
///
/// `forward` computes the mean loss and caches what the gradient needs;
/// `grad` returns the gradient of that mean with respect to the logits.
pub trait Loss {
    /// Computes the mean loss over the batch.
    fn forward(&mut self, logits: &Tensor, labels: &[usize]) -> OpsResult<f32>;

    /// Returns the gradient of the mean loss with respect to the logits
    /// cached by the last [`forward`](Loss::forward) call.
    fn grad(&self) -> OpsResult<Tensor>;

    /// Returns the loss name used in reports.
    fn name(&self) -> &'static str;
}

/// Mean softmax cross-entropy.
///
/// The softmax is max-shifted per row for numerical stability. The gradient
/// is `(softmax(logits) - onehot(labels)) / batch`.
///
/// # Example
///
/// ```
/// use widedeep_layers::tensor::Tensor;
/// use widedeep_ops::{CrossEntropy, Loss};
///
/// let mut loss = CrossEntropy::new();
/// let logits = Tensor::zeros(&[2, 4]);
/// let value = loss.forward(&logits, &[1, 3]).unwrap();
/// // Uniform logits over 4 classes score ln(4)
/// assert!((value - 4.0f32.ln()).abs() < 1e-6);
/// ```
#[derive(Debug, Default)]
pub struct CrossEntropy {
    /// Softmax probabilities cached by the last forward pass.
    cached_probs: Option<Tensor>,
    /// Labels cached by the last forward pass.
    cached_labels: Option<Vec<usize>>,
}

impl CrossEntropy {
    /// Creates a cross-entropy loss with no cached state.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Loss for CrossEntropy {
    fn forward(&mut self, logits: &Tensor, labels: &[usize]) -> OpsResult<f32> {
        if logits.ndim() != 2 {
            return Err(OpsError::ShapeMismatch {
                message: format!("logits must be 2D, got shape {:?}", logits.shape()),
            });
        }
        let batch = logits.shape()[0];
        let classes = logits.shape()[1];
        if batch == 0 || classes == 0 {
            return Err(OpsError::ShapeMismatch {
                message: format!("logits shape {:?} has an empty dimension", logits.shape()),
            });
        }
        if labels.len() != batch {
            return Err(OpsError::ShapeMismatch {
                message: format!(
                    "{} labels for a batch of {} logit rows",
                    labels.len(),
                    batch
                ),
            });
        }
        for &label in labels {
            if label >= classes {
                return Err(OpsError::LabelOutOfRange {
                    label,
                    num_classes: classes,
                });
            }
        }

        let data = logits.data();
        let mut probs = vec![0.0f32; batch * classes];
        let mut total = 0.0f64;
        for i in 0..batch {
            let row = &data[i * classes..(i + 1) * classes];
            let max = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            let mut sum_exp = 0.0f32;
            for j in 0..classes {
                let e = (row[j] - max).exp();
                probs[i * classes + j] = e;
                sum_exp += e;
            }
            for j in 0..classes {
                probs[i * classes + j] /= sum_exp;
            }
            // loss_i = ln(sum_j exp(x_j - max)) - (x_label - max)
            total += (sum_exp.ln() - (row[labels[i]] - max)) as f64;
        }

        self.cached_probs = Some(Tensor::from_data(&[batch, classes], probs));
        self.cached_labels = Some(labels.to_vec());
        Ok((total / batch as f64) as f32)
    }

    fn grad(&self) -> OpsResult<Tensor> {
        let probs = self.cached_probs.as_ref().ok_or(OpsError::NotReady)?;
        let labels = self.cached_labels.as_ref().ok_or(OpsError::NotReady)?;
        let batch = probs.shape()[0];
        let classes = probs.shape()[1];

        let scale = 1.0 / batch as f32;
        let mut grad = probs.scale(scale);
        let data = grad.data_mut();
        for (i, &label) in labels.iter().enumerate() {
            data[i * classes + label] -= scale;
        }
        Ok(grad)
    }

    fn name(&self) -> &'static str {
        "cross_entropy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_logits_score_ln_k() {
        let mut loss = CrossEntropy::new();
        let logits = Tensor::zeros(&[4, 3]);
        let value = loss.forward(&logits, &[0, 1, 2, 0]).unwrap();
        assert!((value - 3.0f32.ln()).abs() < 1e-6);
    }

    #[test]
    fn test_two_class_values() {
        // softmax([2, 0]) = [0.880797, 0.119203]; -ln(0.880797) = 0.126928
        let mut loss = CrossEntropy::new();
        let logits = Tensor::from_data(&[1, 2], vec![2.0, 0.0]);
        let value = loss.forward(&logits, &[0]).unwrap();
        assert!((value - 0.126928).abs() < 1e-4);

        let grad = loss.grad().unwrap();
        assert!((grad.data()[0] + 0.119203).abs() < 1e-4);
        assert!((grad.data()[1] - 0.119203).abs() < 1e-4);
    }

    #[test]
    fn test_grad_rows_sum_to_zero() {
        let mut loss = CrossEntropy::new();
        let logits = Tensor::from_data(&[2, 3], vec![1.0, 2.0, 3.0, 0.5, 0.1, -1.0]);
        loss.forward(&logits, &[2, 0]).unwrap();
        let grad = loss.grad().unwrap();
        assert_eq!(grad.shape(), &[2, 3]);
        for i in 0..2 {
            let row_sum: f32 = grad.data()[i * 3..(i + 1) * 3].iter().sum();
            assert!(row_sum.abs() < 1e-6);
        }
    }

    #[test]
    fn test_confident_correct_prediction() {
        let mut loss = CrossEntropy::new();
        let logits = Tensor::from_data(&[1, 2], vec![10.0, -10.0]);
        let value = loss.forward(&logits, &[0]).unwrap();
        assert!(value < 1e-4);

        // A confident wrong prediction costs roughly the logit gap
        let value = loss.forward(&logits, &[1]).unwrap();
        assert!(value > 19.0);
    }

    #[test]
    fn test_max_shift_stability() {
        let mut loss = CrossEntropy::new();
        let logits = Tensor::from_data(&[1, 2], vec![1000.0, 999.0]);
        let value = loss.forward(&logits, &[0]).unwrap();
        assert!(value.is_finite());
        // ln(1 + e^-1) = 0.3133
        assert!((value - 0.3133).abs() < 1e-3);
    }

    #[test]
    fn test_label_out_of_range() {
        let mut loss = CrossEntropy::new();
        let logits = Tensor::zeros(&[2, 3]);
        let err = loss.forward(&logits, &[0, 3]).unwrap_err();
        assert!(matches!(
            err,
            OpsError::LabelOutOfRange {
                label: 3,
                num_classes: 3
            }
        ));
    }

    #[test]
    fn test_label_count_mismatch() {
        let mut loss = CrossEntropy::new();
        let logits = Tensor::zeros(&[2, 3]);
        assert!(loss.forward(&logits, &[0]).is_err());
    }

    #[test]
    fn test_grad_before_forward() {
        let loss = CrossEntropy::new();
        assert!(matches!(loss.grad(), Err(OpsError::NotReady)));
    }
}
