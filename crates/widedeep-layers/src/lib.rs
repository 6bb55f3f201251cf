//! Tensor primitives and trainable layers for wide-and-deep models.
//!
//! This crate provides the numerical substrate for the widedeep training
//! stack:
//!
//! - **Tensor**: a row-major `f32` array with the matrix operations layers need
//! - **Dense layers**: fully connected linear transformations with seeded
//!   initialization and optional weight regularization
//! - **MLP**: multi-layer perceptrons with configurable topologies
//! - **Activations**: ReLU, Sigmoid, and Tanh
//!
//! # Quick Start
//!
//! ```
//! use widedeep_layers::prelude::*;
//!
//! // Create a simple MLP
//! let mlp = MLPConfig::new(13)
//!     .add_layer(64, ActivationType::ReLU)
//!     .add_layer(32, ActivationType::ReLU)
//!     .add_layer(4, ActivationType::None)
//!     .build()
//!     .unwrap();
//!
//! // Forward pass
//! let input = Tensor::zeros(&[32, 13]); // batch of 32
//! let output = mlp.forward(&input).unwrap();
//! assert_eq!(output.shape(), &[32, 4]);
//! ```
//!
//! # Layer Trait
//!
//! All layers implement the [`Layer`] trait, which provides a unified
//! interface for forward and backward passes:
//!
//! ```
//! use widedeep_layers::prelude::*;
//!
//! fn process_layer<L: Layer>(layer: &L, input: &Tensor) -> Tensor {
//!     layer.forward(input).unwrap()
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod activation;
pub mod dense;
pub mod error;
pub mod initializer;
pub mod layer;
pub mod mlp;
pub mod regularizer;
pub mod tensor;

// Re-export main types at crate level
pub use activation::{ReLU, Sigmoid, Tanh};
pub use dense::Dense;
pub use error::{LayerError, LayerResult};
pub use initializer::Initializer;
pub use layer::Layer;
pub use mlp::{ActivationType, MLPConfig, MLP};
pub use regularizer::Regularizer;
pub use tensor::Tensor;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```
/// use widedeep_layers::prelude::*;
/// ```
pub mod prelude {
    pub use crate::activation::{ReLU, Sigmoid, Tanh};
    pub use crate::dense::Dense;
    pub use crate::error::{LayerError, LayerResult};
    pub use crate::initializer::Initializer;
    pub use crate::layer::Layer;
    pub use crate::mlp::{ActivationType, MLPConfig, MLP};
    pub use crate::regularizer::Regularizer;
    pub use crate::tensor::Tensor;
}
