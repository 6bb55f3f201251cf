//! Plain stochastic gradient descent.

use crate::error::OpsError;
use crate::optimizer::{Optimizer, OptimizerConfig};
use serde::{Deserialize, Serialize};

/// Stochastic gradient descent without momentum.
///
/// Updates parameters using `param = param - learning_rate * gradient`.
///
/// # Example
///
/// ```
/// use widedeep_ops::{Optimizer, OptimizerConfig, Sgd};
///
/// let config = OptimizerConfig::Sgd {
///     learning_rate: 0.01,
/// };
/// let mut sgd = Sgd::new(config).unwrap();
/// let mut param = vec![1.0, 2.0, 3.0];
/// sgd.apply_gradients(&mut param, &[0.1, 0.2, 0.3]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sgd {
    /// Learning rate for gradient updates.
    learning_rate: f32,
    /// Configuration used to create this optimizer.
    config: OptimizerConfig,
}

impl Sgd {
    /// Creates an SGD optimizer at the given learning rate.
    pub fn with_learning_rate(learning_rate: f32) -> Self {
        let config = OptimizerConfig::Sgd { learning_rate };
        Self {
            learning_rate,
            config,
        }
    }
}

impl Optimizer for Sgd {
    fn new(config: OptimizerConfig) -> Result<Self, OpsError> {
        match config {
            OptimizerConfig::Sgd { learning_rate } => Ok(Self {
                learning_rate,
                config,
            }),
            _ => Err(OpsError::ConfigMismatch {
                expected: "Sgd".to_string(),
                got: config.name().to_string(),
            }),
        }
    }

    fn apply_gradients(&mut self, param: &mut [f32], gradients: &[f32]) {
        for (p, g) in param.iter_mut().zip(gradients.iter()) {
            *p -= self.learning_rate * g;
        }
    }

    fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, learning_rate: f32) {
        self.learning_rate = learning_rate;
        self.config = OptimizerConfig::Sgd { learning_rate };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sgd_basic_update() {
        let config = OptimizerConfig::Sgd { learning_rate: 0.1 };
        let mut sgd = Sgd::new(config).unwrap();

        let mut param = vec![1.0, 2.0, 3.0];
        let gradients = vec![1.0, 1.0, 1.0];

        sgd.apply_gradients(&mut param, &gradients);

        assert!((param[0] - 0.9).abs() < 1e-6);
        assert!((param[1] - 1.9).abs() < 1e-6);
        assert!((param[2] - 2.9).abs() < 1e-6);
    }

    #[test]
    fn test_sgd_zero_gradient() {
        let config = OptimizerConfig::Sgd { learning_rate: 0.1 };
        let mut sgd = Sgd::new(config).unwrap();

        let mut param = vec![1.0, 2.0, 3.0];
        sgd.apply_gradients(&mut param, &[0.0, 0.0, 0.0]);

        assert!((param[0] - 1.0).abs() < 1e-6);
        assert!((param[1] - 2.0).abs() < 1e-6);
        assert!((param[2] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_sgd_config_mismatch() {
        let config = OptimizerConfig::Momentum {
            learning_rate: 0.1,
            momentum: 0.9,
        };
        let result = Sgd::new(config);
        result.expect_err("SGD constructor should fail when config variant is not SGD");
    }

    #[test]
    fn test_sgd_set_learning_rate() {
        let mut sgd = Sgd::with_learning_rate(0.1);
        let mut param = vec![1.0];

        sgd.set_learning_rate(0.01);
        sgd.apply_gradients(&mut param, &[1.0]);

        assert!((param[0] - 0.99).abs() < 1e-6);
        assert_eq!(sgd.learning_rate(), 0.01);
        // The stored config tracks the scheduled rate
        assert_eq!(sgd.config().learning_rate(), 0.01);
    }
}
