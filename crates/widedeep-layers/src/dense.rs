//! Dense (fully connected) layer implementation.
//!
//! This module provides the [`Dense`] layer, which performs a linear transformation
//! `y = xW + b` where W is the weight matrix and b is the bias vector.

use crate::error::LayerError;
use crate::initializer::Initializer;
use crate::layer::Layer;
use crate::regularizer::Regularizer;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// A dense (fully connected) layer.
///
/// Performs the transformation `y = xW + b` where:
/// - `x` is the input tensor of shape `[batch_size, in_features]`
/// - `W` is the weight matrix of shape `[in_features, out_features]`
/// - `b` is the bias vector of shape `[out_features]`
/// - `y` is the output tensor of shape `[batch_size, out_features]`
///
/// An optional weight regularizer contributes to [`Layer::regularization_loss`]
/// and folds its gradient into the weight gradient during the backward pass.
///
/// # Example
///
/// ```
/// use widedeep_layers::dense::Dense;
/// use widedeep_layers::layer::Layer;
/// use widedeep_layers::tensor::Tensor;
///
/// let layer = Dense::new(13, 4, 42);
/// let input = Tensor::zeros(&[32, 13]); // batch of 32
/// let output = layer.forward(&input).unwrap();
/// assert_eq!(output.shape(), &[32, 4]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    /// Weight matrix of shape [in_features, out_features]
    weights: Tensor,
    /// Bias vector of shape [out_features]
    bias: Tensor,
    /// Weight regularizer
    regularizer: Regularizer,
    /// Gradient of weights
    weights_grad: Option<Tensor>,
    /// Gradient of bias
    bias_grad: Option<Tensor>,
    /// Cached input for backward pass
    cached_input: Option<Tensor>,
    /// Input feature dimension
    in_features: usize,
    /// Output feature dimension
    out_features: usize,
}

impl Dense {
    /// Creates a new dense layer with the specified input and output dimensions.
    ///
    /// Weights are drawn from a Glorot uniform distribution seeded by `seed`
    /// and biases are initialized to zeros.
    ///
    /// # Example
    ///
    /// ```
    /// use widedeep_layers::dense::Dense;
    ///
    /// let layer = Dense::new(13, 4, 42);
    /// ```
    pub fn new(in_features: usize, out_features: usize, seed: u64) -> Self {
        Self::new_with_initializer(
            in_features,
            out_features,
            Initializer::GlorotUniform,
            Initializer::Zeros,
            seed,
        )
    }

    /// Creates a new dense layer with custom initializers.
    pub fn new_with_initializer(
        in_features: usize,
        out_features: usize,
        weight_init: Initializer,
        bias_init: Initializer,
        seed: u64,
    ) -> Self {
        let weights = weight_init.initialize(&[in_features, out_features], seed);
        let bias = bias_init.initialize(&[out_features], seed.wrapping_add(1));

        Self {
            weights,
            bias,
            regularizer: Regularizer::None,
            weights_grad: None,
            bias_grad: None,
            cached_input: None,
            in_features,
            out_features,
        }
    }

    /// Creates a dense layer from existing weights and bias.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes are incompatible
    pub fn from_weights(weights: Tensor, bias: Tensor) -> Result<Self, LayerError> {
        if weights.ndim() != 2 {
            return Err(LayerError::ConfigError {
                message: format!("Weights must be 2D, got {}D", weights.ndim()),
            });
        }
        if bias.ndim() != 1 {
            return Err(LayerError::ConfigError {
                message: format!("Bias must be 1D, got {}D", bias.ndim()),
            });
        }
        if weights.shape()[1] != bias.shape()[0] {
            return Err(LayerError::ShapeMismatch {
                expected: vec![weights.shape()[1]],
                actual: vec![bias.shape()[0]],
            });
        }

        let in_features = weights.shape()[0];
        let out_features = weights.shape()[1];

        Ok(Self {
            weights,
            bias,
            regularizer: Regularizer::None,
            weights_grad: None,
            bias_grad: None,
            cached_input: None,
            in_features,
            out_features,
        })
    }

    /// Sets the weight regularizer.
    pub fn with_regularizer(mut self, regularizer: Regularizer) -> Self {
        self.regularizer = regularizer;
        self
    }

    /// Replaces the weight regularizer in place.
    pub fn set_regularizer(&mut self, regularizer: Regularizer) {
        self.regularizer = regularizer;
    }

    /// Returns the input feature dimension.
    pub fn in_features(&self) -> usize {
        self.in_features
    }

    /// Returns the output feature dimension.
    pub fn out_features(&self) -> usize {
        self.out_features
    }

    /// Returns a reference to the weights tensor.
    pub fn weights(&self) -> &Tensor {
        &self.weights
    }

    /// Returns a reference to the bias tensor.
    pub fn bias(&self) -> &Tensor {
        &self.bias
    }

    /// Returns the weight gradients if available.
    pub fn weights_grad(&self) -> Option<&Tensor> {
        self.weights_grad.as_ref()
    }

    /// Returns the bias gradients if available.
    pub fn bias_grad(&self) -> Option<&Tensor> {
        self.bias_grad.as_ref()
    }

    /// Performs forward pass and caches input for backward pass.
    ///
    /// Use this method during training to enable gradient computation.
    pub fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        self.cached_input = Some(input.clone());
        self.forward(input)
    }
}

impl Layer for Dense {
    fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        if input.ndim() != 2 {
            return Err(LayerError::ForwardError {
                message: format!("Expected 2D input, got {}D", input.ndim()),
            });
        }
        if input.shape()[1] != self.in_features {
            return Err(LayerError::InvalidInputDimension {
                expected: self.in_features,
                actual: input.shape()[1],
            });
        }

        Ok(input.matmul(&self.weights).add(&self.bias))
    }

    fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError> {
        let input = self
            .cached_input
            .as_ref()
            .ok_or(LayerError::NotInitialized)?;

        if grad.ndim() != 2 || grad.shape()[1] != self.out_features {
            return Err(LayerError::InvalidOutputDimension {
                expected: self.out_features,
                actual: grad.shape().last().copied().unwrap_or(0),
            });
        }

        // dL/dW = x^T @ dL/dy
        let mut weights_grad = input.transpose().matmul(grad);
        if let Some(reg_grad) = self.regularizer.grad(&self.weights) {
            weights_grad = weights_grad.add(&reg_grad);
        }
        self.weights_grad = Some(weights_grad);

        // dL/db = sum(dL/dy, axis=0)
        self.bias_grad = Some(grad.sum_axis(0));

        // dL/dx = dL/dy @ W^T
        Ok(grad.matmul(&self.weights.transpose()))
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.weights, &self.bias]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.weights, &mut self.bias]
    }

    fn gradients(&self) -> Vec<&Tensor> {
        let mut grads = Vec::new();
        if let Some(grad) = self.weights_grad.as_ref() {
            grads.push(grad);
        }
        if let Some(grad) = self.bias_grad.as_ref() {
            grads.push(grad);
        }
        grads
    }

    fn params_and_grads(&mut self) -> Vec<(&mut Tensor, &mut Tensor)> {
        let mut pairs = Vec::new();
        if let Some(grad) = self.weights_grad.as_mut() {
            pairs.push((&mut self.weights, grad));
        }
        if let Some(grad) = self.bias_grad.as_mut() {
            pairs.push((&mut self.bias, grad));
        }
        pairs
    }

    fn regularization_loss(&self) -> f32 {
        self.regularizer.loss(&self.weights)
    }

    fn name(&self) -> &str {
        "Dense"
    }
}
