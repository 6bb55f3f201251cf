//! Multi-layer perceptron (MLP) implementation.
//!
//! This module provides the [`MLP`] struct, which is a stack of dense layers
//! with activation functions between them.

use crate::activation::{ReLU, Sigmoid, Tanh};
use crate::dense::Dense;
use crate::error::LayerError;
use crate::layer::Layer;
use crate::regularizer::Regularizer;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// Activation function types supported by MLP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ActivationType {
    /// Rectified Linear Unit
    #[default]
    ReLU,
    /// Sigmoid function
    Sigmoid,
    /// Hyperbolic tangent
    Tanh,
    /// No activation (identity)
    None,
}

/// Configuration for building an MLP.
///
/// # Example
///
/// ```
/// use widedeep_layers::mlp::{ActivationType, MLPConfig};
///
/// let config = MLPConfig::new(13)
///     .add_layer(64, ActivationType::ReLU)
///     .add_layer(32, ActivationType::ReLU)
///     .add_layer(4, ActivationType::None);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MLPConfig {
    /// Input dimension
    pub input_dim: usize,
    /// Layer configurations: (output_dim, activation)
    pub layers: Vec<(usize, ActivationType)>,
    /// Seed for weight initialization
    pub seed: u64,
    /// Weight regularizer applied to every dense layer
    pub regularizer: Regularizer,
}

impl MLPConfig {
    /// Creates a new MLP configuration with the specified input dimension.
    pub fn new(input_dim: usize) -> Self {
        Self {
            input_dim,
            layers: Vec::new(),
            seed: 42,
            regularizer: Regularizer::None,
        }
    }

    /// Adds a layer to the MLP configuration.
    pub fn add_layer(mut self, output_dim: usize, activation: ActivationType) -> Self {
        self.layers.push((output_dim, activation));
        self
    }

    /// Sets the weight initialization seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the weight regularizer applied to every dense layer.
    pub fn with_regularizer(mut self, regularizer: Regularizer) -> Self {
        self.regularizer = regularizer;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), LayerError> {
        if self.input_dim == 0 {
            return Err(LayerError::ConfigError {
                message: "Input dimension must be positive".to_string(),
            });
        }
        if self.layers.is_empty() {
            return Err(LayerError::ConfigError {
                message: "MLP must have at least one layer".to_string(),
            });
        }
        for (i, (dim, _)) in self.layers.iter().enumerate() {
            if *dim == 0 {
                return Err(LayerError::ConfigError {
                    message: format!("Layer {} has zero output dimension", i),
                });
            }
        }
        Ok(())
    }

    /// Builds the MLP from this configuration.
    pub fn build(self) -> Result<MLP, LayerError> {
        MLP::from_config(self)
    }
}

/// Internal enum to hold different activation layer types.
#[derive(Debug, Clone)]
enum ActivationLayer {
    ReLU(ReLU),
    Sigmoid(Sigmoid),
    Tanh(Tanh),
    None,
}

impl ActivationLayer {
    fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        match self {
            Self::ReLU(a) => a.forward(input),
            Self::Sigmoid(a) => a.forward(input),
            Self::Tanh(a) => a.forward(input),
            Self::None => Ok(input.clone()),
        }
    }

    fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        match self {
            Self::ReLU(a) => a.forward_train(input),
            Self::Sigmoid(a) => a.forward_train(input),
            Self::Tanh(a) => a.forward_train(input),
            Self::None => Ok(input.clone()),
        }
    }

    fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError> {
        match self {
            Self::ReLU(a) => a.backward(grad),
            Self::Sigmoid(a) => a.backward(grad),
            Self::Tanh(a) => a.backward(grad),
            Self::None => Ok(grad.clone()),
        }
    }
}

/// A multi-layer perceptron.
///
/// An MLP consists of multiple dense (fully connected) layers with
/// activation functions between them.
///
/// # Example
///
/// ```
/// use widedeep_layers::layer::Layer;
/// use widedeep_layers::mlp::{ActivationType, MLPConfig};
/// use widedeep_layers::tensor::Tensor;
///
/// let mlp = MLPConfig::new(13)
///     .add_layer(64, ActivationType::ReLU)
///     .add_layer(4, ActivationType::None)
///     .build()
///     .unwrap();
///
/// let input = Tensor::zeros(&[32, 13]);
/// let output = mlp.forward(&input).unwrap();
/// assert_eq!(output.shape(), &[32, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct MLP {
    /// Dense layers
    dense_layers: Vec<Dense>,
    /// Activation layers (one per dense layer)
    activations: Vec<ActivationLayer>,
    /// Configuration used to build this MLP
    config: MLPConfig,
}

impl MLP {
    /// Creates an MLP from a configuration.
    ///
    /// Each dense layer gets its own initialization stream derived from the
    /// configured seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn from_config(config: MLPConfig) -> Result<Self, LayerError> {
        config.validate()?;

        let mut dense_layers = Vec::new();
        let mut activations = Vec::new();

        let mut prev_dim = config.input_dim;
        for (i, (output_dim, activation_type)) in config.layers.iter().enumerate() {
            let layer_seed = config.seed.wrapping_add((i as u64).wrapping_mul(1_000_003));
            let dense = Dense::new(prev_dim, *output_dim, layer_seed)
                .with_regularizer(config.regularizer);
            dense_layers.push(dense);

            let activation = match activation_type {
                ActivationType::ReLU => ActivationLayer::ReLU(ReLU::new()),
                ActivationType::Sigmoid => ActivationLayer::Sigmoid(Sigmoid::new()),
                ActivationType::Tanh => ActivationLayer::Tanh(Tanh::new()),
                ActivationType::None => ActivationLayer::None,
            };
            activations.push(activation);

            prev_dim = *output_dim;
        }

        Ok(Self {
            dense_layers,
            activations,
            config,
        })
    }

    /// Creates an MLP with the given hidden layer sizes.
    ///
    /// Hidden layers use `activation`; the output layer is linear.
    pub fn new(
        input_dim: usize,
        hidden_dims: &[usize],
        output_dim: usize,
        activation: ActivationType,
        seed: u64,
    ) -> Result<Self, LayerError> {
        let mut config = MLPConfig::new(input_dim).with_seed(seed);
        for &dim in hidden_dims {
            config = config.add_layer(dim, activation);
        }
        config = config.add_layer(output_dim, ActivationType::None);
        Self::from_config(config)
    }

    /// Returns the number of layers in the MLP.
    pub fn num_layers(&self) -> usize {
        self.dense_layers.len()
    }

    /// Returns a reference to the dense layers.
    pub fn dense_layers(&self) -> &[Dense] {
        &self.dense_layers
    }

    /// Returns the configuration used to build this MLP.
    pub fn config(&self) -> &MLPConfig {
        &self.config
    }

    /// Returns the input dimension.
    pub fn input_dim(&self) -> usize {
        self.config.input_dim
    }

    /// Returns the output dimension.
    pub fn output_dim(&self) -> usize {
        self.config.layers.last().map(|(d, _)| *d).unwrap_or(0)
    }

    /// Replaces the weight regularizer on every dense layer.
    pub fn set_regularizer(&mut self, regularizer: Regularizer) {
        self.config.regularizer = regularizer;
        for dense in &mut self.dense_layers {
            dense.set_regularizer(regularizer);
        }
    }

    /// Performs forward pass with training mode (caches activations).
    pub fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        let mut x = input.clone();

        for (dense, activation) in self
            .dense_layers
            .iter_mut()
            .zip(self.activations.iter_mut())
        {
            x = dense.forward_train(&x)?;
            x = activation.forward_train(&x)?;
        }

        Ok(x)
    }
}

impl Layer for MLP {
    fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        let mut x = input.clone();

        for (dense, activation) in self.dense_layers.iter().zip(self.activations.iter()) {
            x = dense.forward(&x)?;
            x = activation.forward(&x)?;
        }

        Ok(x)
    }

    fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError> {
        let mut g = grad.clone();

        // Backward pass through layers in reverse order
        for (dense, activation) in self
            .dense_layers
            .iter_mut()
            .zip(self.activations.iter_mut())
            .rev()
        {
            g = activation.backward(&g)?;
            g = dense.backward(&g)?;
        }

        Ok(g)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        self.dense_layers
            .iter()
            .flat_map(|layer| layer.parameters())
            .collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.dense_layers
            .iter_mut()
            .flat_map(|layer| layer.parameters_mut())
            .collect()
    }

    fn gradients(&self) -> Vec<&Tensor> {
        self.dense_layers
            .iter()
            .flat_map(|layer| layer.gradients())
            .collect()
    }

    fn params_and_grads(&mut self) -> Vec<(&mut Tensor, &mut Tensor)> {
        self.dense_layers
            .iter_mut()
            .flat_map(|layer| layer.params_and_grads())
            .collect()
    }

    fn regularization_loss(&self) -> f32 {
        self.dense_layers
            .iter()
            .map(|layer| layer.regularization_loss())
            .sum()
    }

    fn name(&self) -> &str {
        "MLP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mlp_config() {
        let config = MLPConfig::new(13)
            .add_layer(64, ActivationType::ReLU)
            .add_layer(32, ActivationType::ReLU)
            .add_layer(4, ActivationType::None);

        assert_eq!(config.input_dim, 13);
        assert_eq!(config.layers.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mlp_config_invalid() {
        let config = MLPConfig::new(0);
        assert!(config.validate().is_err());

        let config = MLPConfig::new(13);
        assert!(config.validate().is_err()); // No layers

        let config = MLPConfig::new(13).add_layer(0, ActivationType::ReLU);
        assert!(config.validate().is_err()); // Zero dimension
    }

    #[test]
    fn test_mlp_forward() {
        let mlp = MLPConfig::new(10)
            .add_layer(5, ActivationType::ReLU)
            .add_layer(2, ActivationType::None)
            .build()
            .unwrap();

        let input = Tensor::ones(&[3, 10]); // batch of 3
        let output = mlp.forward(&input).unwrap();
        assert_eq!(output.shape(), &[3, 2]);
    }

    #[test]
    fn test_mlp_new() {
        let mlp = MLP::new(13, &[64, 32], 4, ActivationType::ReLU, 42).unwrap();
        assert_eq!(mlp.num_layers(), 3);
        assert_eq!(mlp.input_dim(), 13);
        assert_eq!(mlp.output_dim(), 4);
    }

    #[test]
    fn test_mlp_backward() {
        let mut mlp = MLPConfig::new(10)
            .add_layer(5, ActivationType::ReLU)
            .add_layer(2, ActivationType::None)
            .build()
            .unwrap();

        let input = Tensor::ones(&[3, 10]);
        let _output = mlp.forward_train(&input).unwrap();

        let grad = Tensor::ones(&[3, 2]);
        let input_grad = mlp.backward(&grad).unwrap();
        assert_eq!(input_grad.shape(), &[3, 10]);
        assert_eq!(mlp.gradients().len(), 4);
    }

    #[test]
    fn test_mlp_parameters() {
        let mlp = MLPConfig::new(10)
            .add_layer(5, ActivationType::ReLU)
            .add_layer(2, ActivationType::None)
            .build()
            .unwrap();

        // 2 layers with weights + bias each
        let params = mlp.parameters();
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_mlp_layer_seeds_differ() {
        let mlp = MLP::new(8, &[8], 8, ActivationType::ReLU, 42).unwrap();
        let layers = mlp.dense_layers();
        // Same shape, different initialization streams
        assert_ne!(layers[0].weights(), layers[1].weights());
    }

    #[test]
    fn test_mlp_regularization_loss() {
        let mut mlp = MLPConfig::new(4)
            .add_layer(3, ActivationType::ReLU)
            .add_layer(2, ActivationType::None)
            .with_regularizer(Regularizer::L2(0.01))
            .build()
            .unwrap();

        assert!(mlp.regularization_loss() > 0.0);

        mlp.set_regularizer(Regularizer::None);
        assert_eq!(mlp.regularization_loss(), 0.0);
    }

    #[test]
    fn test_mlp_different_activations() {
        for activation in [
            ActivationType::ReLU,
            ActivationType::Sigmoid,
            ActivationType::Tanh,
            ActivationType::None,
        ] {
            let mlp = MLPConfig::new(10).add_layer(5, activation).build().unwrap();

            let input = Tensor::ones(&[2, 10]);
            let output = mlp.forward(&input);
            assert!(output.is_ok());
        }
    }
}
