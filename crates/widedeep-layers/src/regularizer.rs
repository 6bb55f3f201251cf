//! Regularization penalties for learnable parameters.

use serde::{Deserialize, Serialize};

use crate::tensor::Tensor;

/// Regularizer types supported for layer parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub enum Regularizer {
    /// No regularization.
    #[default]
    None,
    /// L1 regularization with coefficient.
    L1(f32),
    /// L2 regularization with coefficient.
    L2(f32),
    /// Combined L1 + L2 regularization.
    L1L2 {
        /// L1 coefficient
        l1: f32,
        /// L2 coefficient
        l2: f32,
    },
}

impl Regularizer {
    /// Builds a regularizer from optional coefficients, mapping unset values
    /// to "disabled".
    pub fn from_coeffs(l1: Option<f32>, l2: Option<f32>) -> Self {
        match (l1, l2) {
            (None, None) => Regularizer::None,
            (Some(l1), None) => Regularizer::L1(l1),
            (None, Some(l2)) => Regularizer::L2(l2),
            (Some(l1), Some(l2)) => Regularizer::L1L2 { l1, l2 },
        }
    }

    /// Returns the regularization loss for the given parameter tensor.
    pub fn loss(&self, param: &Tensor) -> f32 {
        match *self {
            Regularizer::None => 0.0,
            Regularizer::L1(lambda) => param.abs().sum() * lambda,
            Regularizer::L2(lambda) => param.sqr().sum() * lambda,
            Regularizer::L1L2 { l1, l2 } => param.abs().sum() * l1 + param.sqr().sum() * l2,
        }
    }

    /// Returns the gradient contribution of this regularizer for the given parameter.
    pub fn grad(&self, param: &Tensor) -> Option<Tensor> {
        match *self {
            Regularizer::None => None,
            Regularizer::L1(lambda) => Some(param.map(move |x| sign(x) * lambda)),
            Regularizer::L2(lambda) => Some(param.scale(2.0 * lambda)),
            Regularizer::L1L2 { l1, l2 } => {
                Some(param.map(move |x| sign(x) * l1 + 2.0 * l2 * x))
            }
        }
    }
}

fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_coeffs() {
        assert_eq!(Regularizer::from_coeffs(None, None), Regularizer::None);
        assert_eq!(Regularizer::from_coeffs(Some(0.1), None), Regularizer::L1(0.1));
        assert_eq!(Regularizer::from_coeffs(None, Some(0.2)), Regularizer::L2(0.2));
        assert_eq!(
            Regularizer::from_coeffs(Some(0.1), Some(0.2)),
            Regularizer::L1L2 { l1: 0.1, l2: 0.2 }
        );
    }

    #[test]
    fn test_l1_loss_and_grad() {
        let param = Tensor::from_data(&[2, 2], vec![1.0, -2.0, 3.0, 0.0]);
        let reg = Regularizer::L1(0.5);
        assert!((reg.loss(&param) - 3.0).abs() < 1e-6); // 0.5 * (1 + 2 + 3 + 0)

        let grad = reg.grad(&param).unwrap();
        assert_eq!(grad.data(), &[0.5, -0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_l2_loss_and_grad() {
        let param = Tensor::from_data(&[2], vec![3.0, -4.0]);
        let reg = Regularizer::L2(0.1);
        assert!((reg.loss(&param) - 2.5).abs() < 1e-6); // 0.1 * (9 + 16)

        let grad = reg.grad(&param).unwrap();
        assert!((grad.data()[0] - 0.6).abs() < 1e-6); // 2 * 0.1 * 3
        assert!((grad.data()[1] + 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_none_has_no_grad() {
        let param = Tensor::ones(&[3]);
        assert_eq!(Regularizer::None.loss(&param), 0.0);
        assert!(Regularizer::None.grad(&param).is_none());
    }
}
