//! Gradient descent with momentum.
//!
//! Momentum accumulates a velocity vector in the direction of persistent
//! loss reduction, which damps oscillation and speeds up convergence on
//! ravines of the loss surface.

use crate::error::OpsError;
use crate::optimizer::{Optimizer, OptimizerConfig};
use serde::{Deserialize, Serialize};

/// Momentum optimizer.
///
/// Updates parameters using:
/// ```text
/// velocity = momentum * velocity + gradient
/// param = param - learning_rate * velocity
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Momentum {
    /// Learning rate for gradient updates.
    learning_rate: f32,
    /// Velocity retention coefficient.
    momentum: f32,
    /// Velocity buffer, sized to the parameter on first use.
    velocity: Vec<f32>,
    /// Configuration used to create this optimizer.
    config: OptimizerConfig,
}

impl Momentum {
    /// Creates a Momentum optimizer with the given parameters.
    pub fn with_params(learning_rate: f32, momentum: f32) -> Self {
        let config = OptimizerConfig::Momentum {
            learning_rate,
            momentum,
        };
        Self {
            learning_rate,
            momentum,
            velocity: Vec::new(),
            config,
        }
    }

    /// Returns the current velocity state.
    pub fn velocity(&self) -> &[f32] {
        &self.velocity
    }

    /// Resets the accumulated velocity.
    pub fn reset_state(&mut self) {
        self.velocity.clear();
    }
}

impl Optimizer for Momentum {
    fn new(config: OptimizerConfig) -> Result<Self, OpsError> {
        match config {
            OptimizerConfig::Momentum {
                learning_rate,
                momentum,
            } => Ok(Self {
                learning_rate,
                momentum,
                velocity: Vec::new(),
                config,
            }),
            _ => Err(OpsError::ConfigMismatch {
                expected: "Momentum".to_string(),
                got: config.name().to_string(),
            }),
        }
    }

    fn apply_gradients(&mut self, param: &mut [f32], gradients: &[f32]) {
        if self.velocity.len() != param.len() {
            self.velocity = vec![0.0; param.len()];
        }

        for (i, (p, g)) in param.iter_mut().zip(gradients.iter()).enumerate() {
            self.velocity[i] = self.momentum * self.velocity[i] + g;
            *p -= self.learning_rate * self.velocity[i];
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
        self.config = OptimizerConfig::Momentum {
            learning_rate,
            momentum: self.momentum,
        };
    }
}
