//! Learning-rate schedules.
//!
//! A schedule maps a global step to the learning rate in effect at that step.
//! The exponential schedule uses a continuous exponent, so the rate decays
//! smoothly rather than in staircase jumps.

use crate::error::{OpsError, OpsResult};
use serde::{Deserialize, Serialize};

/// Learning rate as a function of the global step.
///
/// # Example
///
/// ```
/// use widedeep_ops::LearningRate;
///
/// let schedule = LearningRate::exponential(0.01, 10_000, 0.5).unwrap();
/// assert_eq!(schedule.at(0), 0.01);
/// assert!((schedule.at(10_000) - 0.005).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LearningRate {
    /// The same rate at every step.
    Constant(f32),
    /// `initial * decay_rate^(step / decay_steps)` with a continuous exponent.
    ExponentialDecay {
        /// Rate at step zero.
        initial: f32,
        /// Steps over which one full decay factor is applied.
        decay_steps: usize,
        /// Multiplicative decay per `decay_steps` steps.
        decay_rate: f32,
    },
}

impl LearningRate {
    /// Creates a constant schedule.
    pub fn constant(learning_rate: f32) -> Self {
        LearningRate::Constant(learning_rate)
    }

    /// Creates an exponential decay schedule.
    ///
    /// Fails if `decay_steps` is zero or `decay_rate` is not positive.
    pub fn exponential(initial: f32, decay_steps: usize, decay_rate: f32) -> OpsResult<Self> {
        if decay_steps == 0 {
            return Err(OpsError::InvalidParameter(
                "decay_steps must be positive".to_string(),
            ));
        }
        if decay_rate <= 0.0 {
            return Err(OpsError::InvalidParameter(
                "decay_rate must be positive".to_string(),
            ));
        }
        Ok(LearningRate::ExponentialDecay {
            initial,
            decay_steps,
            decay_rate,
        })
    }

    /// Builds a schedule from an initial rate and an optional decay pair.
    ///
    /// Both decay fields unset gives a constant schedule; both set gives
    /// exponential decay; exactly one set is a configuration error.
    pub fn from_flags(
        initial: f32,
        decay_steps: Option<usize>,
        decay_rate: Option<f32>,
    ) -> OpsResult<Self> {
        match (decay_steps, decay_rate) {
            (None, None) => Ok(LearningRate::Constant(initial)),
            (Some(steps), Some(rate)) => LearningRate::exponential(initial, steps, rate),
            (Some(_), None) => Err(OpsError::InvalidParameter(
                "decay_steps set without decay_rate".to_string(),
            )),
            (None, Some(_)) => Err(OpsError::InvalidParameter(
                "decay_rate set without decay_steps".to_string(),
            )),
        }
    }

    /// Returns the learning rate in effect at the given global step.
    pub fn at(&self, step: u64) -> f32 {
        match *self {
            LearningRate::Constant(rate) => rate,
            LearningRate::ExponentialDecay {
                initial,
                decay_steps,
                decay_rate,
            } => initial * decay_rate.powf(step as f32 / decay_steps as f32),
        }
    }

    /// Returns the rate at step zero.
    pub fn initial(&self) -> f32 {
        match *self {
            LearningRate::Constant(rate) => rate,
            LearningRate::ExponentialDecay { initial, .. } => initial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_ignores_step() {
        let schedule = LearningRate::constant(0.01);
        assert_eq!(schedule.at(0), 0.01);
        assert_eq!(schedule.at(5000), 0.01);
        assert_eq!(schedule.initial(), 0.01);
    }

    #[test]
    fn test_exponential_endpoints() {
        let schedule = LearningRate::exponential(0.01, 10_000, 0.5).unwrap();
        assert_eq!(schedule.at(0), 0.01);
        // One full decay period applies the rate exactly once
        assert!((schedule.at(10_000) - 0.005).abs() < 1e-9);
        assert!((schedule.at(20_000) - 0.0025).abs() < 1e-9);
    }

    #[test]
    fn test_exponential_is_continuous() {
        let schedule = LearningRate::exponential(0.01, 1000, 0.5).unwrap();
        // Halfway through a period: initial * rate^0.5
        let expected = 0.01 * 0.5f32.powf(0.5);
        assert!((schedule.at(500) - expected).abs() < 1e-9);
        // Strictly decreasing between the endpoints, not a staircase
        assert!(schedule.at(500) < schedule.at(0));
        assert!(schedule.at(500) > schedule.at(1000));
    }

    #[test]
    fn test_exponential_rejects_bad_parameters() {
        assert!(LearningRate::exponential(0.01, 0, 0.5).is_err());
        assert!(LearningRate::exponential(0.01, 1000, 0.0).is_err());
        assert!(LearningRate::exponential(0.01, 1000, -0.5).is_err());
    }

    #[test]
    fn test_from_flags() {
        let constant = LearningRate::from_flags(0.01, None, None).unwrap();
        assert_eq!(constant, LearningRate::Constant(0.01));

        let decay = LearningRate::from_flags(0.01, Some(10_000), Some(0.5)).unwrap();
        assert!(matches!(decay, LearningRate::ExponentialDecay { .. }));

        // A half-set decay pair is a configuration error
        assert!(LearningRate::from_flags(0.01, Some(10_000), None).is_err());
        assert!(LearningRate::from_flags(0.01, None, Some(0.5)).is_err());
    }
}
