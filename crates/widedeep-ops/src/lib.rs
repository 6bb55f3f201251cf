//! Losses, optimizers, learning-rate schedules, and evaluation metrics for
//! training wide-and-deep classifiers.
//!
//! This crate supplies the numeric training machinery that sits between the
//! layer substrate ([`widedeep_layers`]) and the model layer:
//!
//! - [`CrossEntropy`]: mean softmax cross-entropy over integer class labels
//! - [`Sgd`] and [`Momentum`] optimizers behind the object-safe
//!   [`OptimizerDyn`] interface, one instance per parameter tensor
//! - [`LearningRate`]: constant or continuously decaying exponential schedule
//! - [`Accuracy`] plus the deterministic [`AccuracyRandom`] and
//!   [`AccuracyMode`] baselines
//!
//! # Quick Start
//!
//! ```
//! use widedeep_layers::tensor::Tensor;
//! use widedeep_ops::{create_optimizer, CrossEntropy, LearningRate, Loss, OptimizerKind};
//!
//! // Schedule and optimizer for one parameter tensor
//! let schedule = LearningRate::from_flags(0.01, Some(10_000), Some(0.5)).unwrap();
//! let mut optimizer = create_optimizer(OptimizerKind::Sgd.config(schedule.at(0)));
//!
//! // One loss evaluation over a batch of logits
//! let mut loss = CrossEntropy::new();
//! let logits = Tensor::from_data(&[1, 2], vec![0.5, -0.5]);
//! let value = loss.forward(&logits, &[0]).unwrap();
//! let grad = loss.grad().unwrap();
//!
//! // Gradient step at the scheduled rate
//! let mut params = logits.data().to_vec();
//! optimizer.set_learning_rate(schedule.at(1));
//! optimizer.apply_gradients(&mut params, grad.data());
//! # assert!(value > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod loss;
pub mod metrics;
pub mod momentum;
pub mod optimizer;
pub mod schedule;
pub mod sgd;

pub use error::{OpsError, OpsResult};
pub use loss::{CrossEntropy, Loss};
pub use metrics::{Accuracy, AccuracyMode, AccuracyRandom, Metric};
pub use momentum::Momentum;
pub use optimizer::{create_optimizer, Optimizer, OptimizerConfig, OptimizerDyn, OptimizerKind};
pub use schedule::LearningRate;
pub use sgd::Sgd;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::error::{OpsError, OpsResult};
    pub use crate::loss::{CrossEntropy, Loss};
    pub use crate::metrics::{Accuracy, AccuracyMode, AccuracyRandom, Metric};
    pub use crate::momentum::Momentum;
    pub use crate::optimizer::{
        create_optimizer, Optimizer, OptimizerConfig, OptimizerDyn, OptimizerKind,
    };
    pub use crate::schedule::LearningRate;
    pub use crate::sgd::Sgd;
}
