//! Activation function layers.
//!
//! This module provides the activation functions used between dense layers:
//! ReLU, Sigmoid, and Tanh.

use crate::error::LayerError;
use crate::layer::Layer;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// Rectified Linear Unit (ReLU) activation function.
///
/// Computes `f(x) = max(0, x)` element-wise.
///
/// # Example
///
/// ```
/// use widedeep_layers::activation::ReLU;
/// use widedeep_layers::layer::Layer;
/// use widedeep_layers::tensor::Tensor;
///
/// let relu = ReLU::new();
/// let input = Tensor::from_data(&[2, 2], vec![-1.0, 0.0, 1.0, 2.0]);
/// let output = relu.forward(&input).unwrap();
/// assert_eq!(output.data(), &[0.0, 0.0, 1.0, 2.0]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReLU {
    /// Cached input for backward pass
    cached_input: Option<Tensor>,
}

impl ReLU {
    /// Creates a new ReLU activation layer.
    pub fn new() -> Self {
        Self { cached_input: None }
    }

    /// Performs forward pass and caches input for backward pass.
    pub fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        self.cached_input = Some(input.clone());
        self.forward(input)
    }
}

impl Layer for ReLU {
    fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        Ok(input.map(|x| x.max(0.0)))
    }

    fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError> {
        let input = self
            .cached_input
            .as_ref()
            .ok_or(LayerError::NotInitialized)?;

        // ReLU gradient: 1 if x > 0, else 0
        let mask = input.map(|x| if x > 0.0 { 1.0 } else { 0.0 });
        Ok(grad.mul(&mask))
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![] // No learnable parameters
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![]
    }

    fn name(&self) -> &str {
        "ReLU"
    }
}

/// Sigmoid activation function.
///
/// Computes `f(x) = 1 / (1 + exp(-x))` element-wise.
///
/// # Example
///
/// ```
/// use widedeep_layers::activation::Sigmoid;
/// use widedeep_layers::layer::Layer;
/// use widedeep_layers::tensor::Tensor;
///
/// let sigmoid = Sigmoid::new();
/// let input = Tensor::zeros(&[2, 2]);
/// let output = sigmoid.forward(&input).unwrap();
/// // sigmoid(0) = 0.5
/// assert!((output.data()[0] - 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sigmoid {
    /// Cached output for backward pass (more efficient than caching input)
    cached_output: Option<Tensor>,
}

impl Sigmoid {
    /// Creates a new Sigmoid activation layer.
    pub fn new() -> Self {
        Self {
            cached_output: None,
        }
    }

    /// Performs forward pass and caches output for backward pass.
    pub fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        let output = self.forward(input)?;
        self.cached_output = Some(output.clone());
        Ok(output)
    }
}

impl Layer for Sigmoid {
    fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        Ok(input.map(|x| 1.0 / (1.0 + (-x).exp())))
    }

    fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError> {
        let output = self
            .cached_output
            .as_ref()
            .ok_or(LayerError::NotInitialized)?;

        // Sigmoid gradient: sigmoid(x) * (1 - sigmoid(x)) = output * (1 - output)
        let grad_multiplier = output.map(|y| y * (1.0 - y));
        Ok(grad.mul(&grad_multiplier))
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![]
    }

    fn name(&self) -> &str {
        "Sigmoid"
    }
}

/// Hyperbolic tangent (Tanh) activation function.
///
/// Computes `f(x) = tanh(x)` element-wise.
///
/// # Example
///
/// ```
/// use widedeep_layers::activation::Tanh;
/// use widedeep_layers::layer::Layer;
/// use widedeep_layers::tensor::Tensor;
///
/// let tanh = Tanh::new();
/// let input = Tensor::zeros(&[2, 2]);
/// let output = tanh.forward(&input).unwrap();
/// // tanh(0) = 0
/// assert!(output.data()[0].abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tanh {
    /// Cached output for backward pass
    cached_output: Option<Tensor>,
}

impl Tanh {
    /// Creates a new Tanh activation layer.
    pub fn new() -> Self {
        Self {
            cached_output: None,
        }
    }

    /// Performs forward pass and caches output for backward pass.
    pub fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        let output = self.forward(input)?;
        self.cached_output = Some(output.clone());
        Ok(output)
    }
}

impl Layer for Tanh {
    fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        Ok(input.map(|x| x.tanh()))
    }

    fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError> {
        let output = self
            .cached_output
            .as_ref()
            .ok_or(LayerError::NotInitialized)?;

        // Tanh gradient: 1 - tanh(x)^2 = 1 - output^2
        let grad_multiplier = output.map(|y| 1.0 - y * y);
        Ok(grad.mul(&grad_multiplier))
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![]
    }

    fn name(&self) -> &str {
        "Tanh"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relu_forward() {
        let relu = ReLU::new();
        let input = Tensor::from_data(&[2, 3], vec![-2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
        let output = relu.forward(&input).unwrap();
        assert_eq!(output.data(), &[0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_relu_backward() {
        let mut relu = ReLU::new();
        let input = Tensor::from_data(&[2, 3], vec![-2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
        let _output = relu.forward_train(&input).unwrap();

        let grad = Tensor::ones(&[2, 3]);
        let input_grad = relu.backward(&grad).unwrap();
        assert_eq!(input_grad.data(), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_relu_backward_without_forward() {
        let mut relu = ReLU::new();
        let grad = Tensor::ones(&[2, 3]);
        assert!(relu.backward(&grad).is_err());
    }

    #[test]
    fn test_sigmoid_forward() {
        let sigmoid = Sigmoid::new();
        let input = Tensor::zeros(&[2, 2]);
        let output = sigmoid.forward(&input).unwrap();

        for &val in output.data() {
            assert!((val - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sigmoid_backward() {
        let mut sigmoid = Sigmoid::new();
        let input = Tensor::zeros(&[1, 2]);
        let _output = sigmoid.forward_train(&input).unwrap();

        let grad = Tensor::ones(&[1, 2]);
        let input_grad = sigmoid.backward(&grad).unwrap();
        // At x = 0: sigmoid = 0.5, gradient = 0.5 * (1 - 0.5) = 0.25
        for &val in input_grad.data() {
            assert!((val - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn test_tanh_forward() {
        let tanh = Tanh::new();
        let input = Tensor::zeros(&[2, 2]);
        let output = tanh.forward(&input).unwrap();

        for &val in output.data() {
            assert!(val.abs() < 1e-6);
        }
    }

    #[test]
    fn test_tanh_backward() {
        let mut tanh = Tanh::new();
        let input = Tensor::zeros(&[1, 2]);
        let _output = tanh.forward_train(&input).unwrap();

        let grad = Tensor::ones(&[1, 2]);
        let input_grad = tanh.backward(&grad).unwrap();
        // At x = 0: tanh = 0, gradient = 1 - 0^2 = 1
        for &val in input_grad.data() {
            assert!((val - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_activation_no_parameters() {
        let relu = ReLU::new();
        assert!(relu.parameters().is_empty());

        let sigmoid = Sigmoid::new();
        assert!(sigmoid.parameters().is_empty());

        let tanh = Tanh::new();
        assert!(tanh.parameters().is_empty());
    }
}
