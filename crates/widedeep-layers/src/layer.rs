//! Layer trait definition for trainable layers.
//!
//! This module defines the core [`Layer`] trait that all layers implement,
//! providing a unified interface for forward passes, backward passes, and
//! parameter access.

use crate::error::LayerError;
use crate::tensor::Tensor;

/// A layer that supports forward and backward propagation.
///
/// Each layer must be able to:
/// - Perform a forward pass to compute outputs from inputs
/// - Perform a backward pass to compute gradients
/// - Expose its learnable parameters and their gradients
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
pub trait Layer: Send + Sync {
    /// Performs a forward pass through the layer.
    ///
    /// # Errors
    ///
    /// Returns a [`LayerError`] if the input shape is incompatible with the layer
    fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError>;

    /// Performs a backward pass through the layer.
    ///
    /// Takes the gradient of the loss with respect to the layer's output,
    /// stores the gradients of the layer's own parameters, and returns the
    /// gradient with respect to the layer's input.
    ///
    /// # Errors
    ///
    /// Returns a [`LayerError`] if the gradient shape is incompatible or no
    /// training forward pass has been run
    fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError>;

    /// Returns references to the layer's learnable parameters.
    fn parameters(&self) -> Vec<&Tensor>;

    /// Returns mutable references to the layer's learnable parameters.
    fn parameters_mut(&mut self) -> Vec<&mut Tensor>;

    /// Returns references to the parameter gradients computed by the last
    /// backward pass, aligned with [`Layer::parameters`].
    ///
    /// Empty until a backward pass has run. Default implementation returns
    /// no gradients, which is correct for parameterless layers.
    fn gradients(&self) -> Vec<&Tensor> {
        Vec::new()
    }

    /// Returns paired mutable references to each parameter and its gradient.
    ///
    /// Used by optimizers to scale gradients in place and apply updates.
    /// Pairs are only present for parameters whose gradients exist, so this
    /// is empty before the first backward pass.
    fn params_and_grads(&mut self) -> Vec<(&mut Tensor, &mut Tensor)> {
        Vec::new()
    }

    /// Returns the regularization loss contributed by this layer.
    ///
    /// Default implementation returns 0.0.
    fn regularization_loss(&self) -> f32 {
        0.0
    }

    /// Returns the name of the layer for debugging and logging purposes.
    fn name(&self) -> &str {
        "Layer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Mock layer for testing
    struct MockLayer {
        weight: Tensor,
    }

    impl MockLayer {
        fn new() -> Self {
            Self {
                weight: Tensor::zeros(&[10, 10]),
            }
        }
    }

    impl Layer for MockLayer {
        fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
            Ok(input.clone())
        }

        fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError> {
            Ok(grad.clone())
        }

        fn parameters(&self) -> Vec<&Tensor> {
            vec![&self.weight]
        }

        fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
            vec![&mut self.weight]
        }

        fn name(&self) -> &str {
            "MockLayer"
        }
    }

    #[test]
    fn test_layer_trait() {
        let mut layer = MockLayer::new();
        let input = Tensor::zeros(&[2, 10]);

        let output = layer.forward(&input).unwrap();
        assert_eq!(output.shape(), input.shape());

        let grad = Tensor::ones(&[2, 10]);
        let input_grad = layer.backward(&grad).unwrap();
        assert_eq!(input_grad.shape(), grad.shape());

        assert_eq!(layer.parameters().len(), 1);
        assert_eq!(layer.name(), "MockLayer");
    }

    #[test]
    fn test_default_gradient_accessors() {
        let mut layer = MockLayer::new();
        assert!(layer.gradients().is_empty());
        assert!(layer.params_and_grads().is_empty());
        assert_eq!(layer.regularization_loss(), 0.0);
    }
}
