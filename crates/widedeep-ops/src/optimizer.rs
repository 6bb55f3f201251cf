//! Optimizer configuration and the traits shared by implementations.
//!
//! Optimizers are stateful per parameter tensor: create one instance per
//! parameter and feed it that parameter's gradient every step. A learning-rate
//! schedule pushes the current rate in through `set_learning_rate` before the
//! update is applied.

use crate::error::OpsError;
use crate::momentum::Momentum;
use crate::sgd::Sgd;
use serde::{Deserialize, Serialize};

/// Optimizer family named by a predictor spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OptimizerKind {
    /// Plain stochastic gradient descent.
    #[default]
    Sgd,
    /// Gradient descent with a velocity term.
    Momentum,
}

impl OptimizerKind {
    /// Builds the configuration for this family at the given learning rate.
    ///
    /// Momentum uses the conventional velocity coefficient 0.9.
    pub fn config(self, learning_rate: f32) -> OptimizerConfig {
        match self {
            OptimizerKind::Sgd => OptimizerConfig::Sgd { learning_rate },
            OptimizerKind::Momentum => OptimizerConfig::Momentum {
                learning_rate,
                momentum: 0.9,
            },
        }
    }
}

/// Configuration for creating an optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OptimizerConfig {
    /// Plain SGD configuration.
    Sgd {
        /// Learning rate for gradient updates.
        learning_rate: f32,
    },
    /// Momentum configuration.
    Momentum {
        /// Learning rate for gradient updates.
        learning_rate: f32,
        /// Velocity retention coefficient.
        momentum: f32,
    },
}

impl OptimizerConfig {
    /// Returns the name of the optimizer type.
    pub fn name(&self) -> &'static str {
        match self {
            OptimizerConfig::Sgd { .. } => "Sgd",
            OptimizerConfig::Momentum { .. } => "Momentum",
        }
    }

    /// Returns the configured learning rate.
    pub fn learning_rate(&self) -> f32 {
        match self {
            OptimizerConfig::Sgd { learning_rate } => *learning_rate,
            OptimizerConfig::Momentum { learning_rate, .. } => *learning_rate,
        }
    }
}

/// Trait implemented by all gradient descent optimizers.
pub trait Optimizer: Sized {
    /// Creates a new optimizer from a configuration.
    ///
    /// Fails with [`OpsError::ConfigMismatch`] when the config describes a
    /// different optimizer type.
    fn new(config: OptimizerConfig) -> Result<Self, OpsError>;

    /// Applies gradients to a parameter slice in place.
    fn apply_gradients(&mut self, param: &mut [f32], gradients: &[f32]);

    /// Returns the optimizer configuration.
    fn config(&self) -> &OptimizerConfig;

    /// Returns the learning rate currently in effect.
    fn learning_rate(&self) -> f32;

    /// Replaces the learning rate, typically from a decay schedule.
    fn set_learning_rate(&mut self, learning_rate: f32);
}

/// Object-safe optimizer interface for heterogeneous collections.
pub trait OptimizerDyn {
    /// Applies gradients to a parameter slice in place.
    fn apply_gradients(&mut self, param: &mut [f32], gradients: &[f32]);

    /// Returns the optimizer configuration.
    fn config(&self) -> &OptimizerConfig;

    /// Returns the learning rate currently in effect.
    fn learning_rate(&self) -> f32;

    /// Replaces the learning rate, typically from a decay schedule.
    fn set_learning_rate(&mut self, learning_rate: f32);
}

impl<T: Optimizer> OptimizerDyn for T {
    fn apply_gradients(&mut self, param: &mut [f32], gradients: &[f32]) {
        Optimizer::apply_gradients(self, param, gradients)
    }

    fn config(&self) -> &OptimizerConfig {
        Optimizer::config(self)
    }

    fn learning_rate(&self) -> f32 {
        Optimizer::learning_rate(self)
    }

    fn set_learning_rate(&mut self, learning_rate: f32) {
        Optimizer::set_learning_rate(self, learning_rate)
    }
}

/// Creates a boxed optimizer from a configuration.
///
/// # Example
///
/// ```
/// use widedeep_ops::{create_optimizer, OptimizerConfig};
///
/// let config = OptimizerConfig::Sgd {
///     learning_rate: 0.01,
/// };
/// let mut optimizer = create_optimizer(config);
/// let mut param = vec![1.0, 2.0];
/// optimizer.apply_gradients(&mut param, &[1.0, 1.0]);
/// assert!((param[0] - 0.99).abs() < 1e-6);
/// ```
pub fn create_optimizer(config: OptimizerConfig) -> Box<dyn OptimizerDyn> {
    // The arm guarantees the variant, so the constructors cannot fail
    match &config {
        OptimizerConfig::Sgd { .. } => Box::new(Sgd::new(config).unwrap()),
        OptimizerConfig::Momentum { .. } => Box::new(Momentum::new(config).unwrap()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimizer_config_name() {
        assert_eq!(OptimizerConfig::Sgd { learning_rate: 0.1 }.name(), "Sgd");
        assert_eq!(
            OptimizerConfig::Momentum {
                learning_rate: 0.1,
                momentum: 0.9,
            }
            .name(),
            "Momentum"
        );
    }

    #[test]
    fn test_optimizer_config_learning_rate() {
        assert_eq!(
            OptimizerConfig::Sgd { learning_rate: 0.1 }.learning_rate(),
            0.1
        );
        assert_eq!(
            OptimizerConfig::Momentum {
                learning_rate: 0.05,
                momentum: 0.9,
            }
            .learning_rate(),
            0.05
        );
    }

    #[test]
    fn test_kind_builds_config() {
        let config = OptimizerKind::Sgd.config(0.01);
        assert_eq!(config, OptimizerConfig::Sgd { learning_rate: 0.01 });

        let config = OptimizerKind::Momentum.config(0.01);
        assert!(
            matches!(config, OptimizerConfig::Momentum { learning_rate, momentum }
                if learning_rate == 0.01 && momentum == 0.9)
        );
    }

    #[test]
    fn test_create_all_optimizer_types() {
        let kinds = [OptimizerKind::Sgd, OptimizerKind::Momentum];
        for kind in kinds {
            let config = kind.config(0.01);
            let optimizer = create_optimizer(config);
            assert_eq!(optimizer.config().name(), config.name());
            assert_eq!(optimizer.learning_rate(), 0.01);
        }
    }

    #[test]
    fn test_dyn_set_learning_rate() {
        let mut optimizer = create_optimizer(OptimizerConfig::Sgd { learning_rate: 0.1 });
        optimizer.set_learning_rate(0.05);
        assert_eq!(optimizer.learning_rate(), 0.05);
        assert_eq!(optimizer.config().learning_rate(), 0.05);
    }

    #[test]
    fn test_optimizer_config_serialization() {
        let config = OptimizerConfig::Momentum {
            learning_rate: 0.01,
            momentum: 0.9,
        };
        let json = serde_json::to_string(&config).unwrap();
        let restored: OptimizerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
