//! Seeded weight initialization.
//!
//! Every initializer draws from a local LCG stream keyed by an explicit seed,
//! so the same seed always produces the same weights regardless of what else
//! ran before.

use serde::{Deserialize, Serialize};

use crate::tensor::Tensor;

/// Weight initialization schemes for layer parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Initializer {
    /// All zeros. Used for biases and for linear model weights.
    Zeros,
    /// Constant value.
    Constant(f32),
    /// Glorot/Xavier uniform initialization.
    #[default]
    GlorotUniform,
    /// Glorot/Xavier normal initialization.
    GlorotNormal,
}

impl Initializer {
    /// Materializes a tensor of the given shape.
    ///
    /// The seed selects the random stream for the stochastic schemes and is
    /// ignored by `Zeros` and `Constant`.
    pub fn initialize(&self, shape: &[usize], seed: u64) -> Tensor {
        match self {
            Initializer::Zeros => Tensor::zeros(shape),
            Initializer::Constant(value) => {
                Tensor::from_data(shape, vec![*value; shape.iter().product()])
            }
            Initializer::GlorotUniform => {
                let (fan_in, fan_out) = fan_in_out(shape);
                let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
                let mut rng = Lcg::new(seed);
                let n: usize = shape.iter().product();
                let data: Vec<f32> = (0..n).map(|_| (2.0 * rng.next_f32() - 1.0) * limit).collect();
                Tensor::from_data(shape, data)
            }
            Initializer::GlorotNormal => {
                let (fan_in, fan_out) = fan_in_out(shape);
                let std = (2.0 / (fan_in + fan_out) as f32).sqrt();
                let mut rng = Lcg::new(seed);
                let n: usize = shape.iter().product();
                let data: Vec<f32> = (0..n).map(|_| rng.next_standard_normal() * std).collect();
                Tensor::from_data(shape, data)
            }
        }
    }
}

fn fan_in_out(shape: &[usize]) -> (usize, usize) {
    if shape.len() >= 2 {
        (shape[0].max(1), shape[1].max(1))
    } else if shape.len() == 1 {
        let dim = shape[0].max(1);
        (dim, dim)
    } else {
        (1, 1)
    }
}

/// Simple LCG random number generator for reproducibility.
#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1103515245).wrapping_add(12345);
        ((self.state >> 16) & 0x7fff) as u32
    }

    fn next_f32(&mut self) -> f32 {
        // [0, 1)
        self.next_u32() as f32 / 32768.0
    }

    fn next_standard_normal(&mut self) -> f32 {
        // Box-Muller transform, deterministic from the LCG.
        let u1 = self.next_f32().max(1e-10);
        let u2 = self.next_f32();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos()
    }
}
