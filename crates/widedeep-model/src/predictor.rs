//! Runtime predictors built from [`ModelSpec`]s.
//!
//! A [`Predictor`] pairs a network with its learning-rate schedule and one
//! optimizer instance per parameter tensor, so stateful optimizers keep their
//! state aligned with the tensor they update.

use crate::error::{ModelError, ModelResult};
use crate::spec::ModelSpec;
use widedeep_layers::{ActivationType, Dense, Initializer, Layer, Regularizer, Tensor, MLP};
use widedeep_ops::{create_optimizer, LearningRate, OptimizerDyn};

/// The network behind a predictor.
enum Network {
    /// Single dense layer, zero-initialized so the first logits are all zero.
    Linear(Dense),
    /// ReLU MLP with a linear output layer.
    Mlp(MLP),
}

impl Network {
    fn forward(&self, features: &Tensor) -> ModelResult<Tensor> {
        match self {
            Network::Linear(dense) => Ok(dense.forward(features)?),
            Network::Mlp(mlp) => Ok(mlp.forward(features)?),
        }
    }

    fn forward_train(&mut self, features: &Tensor) -> ModelResult<Tensor> {
        match self {
            Network::Linear(dense) => Ok(dense.forward_train(features)?),
            Network::Mlp(mlp) => Ok(mlp.forward_train(features)?),
        }
    }

    fn backward(&mut self, grad: &Tensor) -> ModelResult<Tensor> {
        match self {
            Network::Linear(dense) => Ok(dense.backward(grad)?),
            Network::Mlp(mlp) => Ok(mlp.backward(grad)?),
        }
    }

    fn parameters(&self) -> Vec<&Tensor> {
        match self {
            Network::Linear(dense) => dense.parameters(),
            Network::Mlp(mlp) => mlp.parameters(),
        }
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        match self {
            Network::Linear(dense) => dense.parameters_mut(),
            Network::Mlp(mlp) => mlp.parameters_mut(),
        }
    }

    fn gradients(&self) -> Vec<&Tensor> {
        match self {
            Network::Linear(dense) => dense.gradients(),
            Network::Mlp(mlp) => mlp.gradients(),
        }
    }

    fn params_and_grads(&mut self) -> Vec<(&mut Tensor, &mut Tensor)> {
        match self {
            Network::Linear(dense) => dense.params_and_grads(),
            Network::Mlp(mlp) => mlp.params_and_grads(),
        }
    }

    fn regularization_loss(&self) -> f32 {
        match self {
            Network::Linear(dense) => dense.regularization_loss(),
            Network::Mlp(mlp) => mlp.regularization_loss(),
        }
    }
}

/// A predictor contributing logits to the joint classifier.
pub struct Predictor {
    name: String,
    network: Network,
    schedule: LearningRate,
    optimizers: Vec<Box<dyn OptimizerDyn>>,
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Predictor {
    /// Builds a predictor from its spec.
    ///
    /// `outputs` is the logit width (number of classes) and `regularizer` is
    /// the joint-level weight penalty shared by every predictor.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError::ConfigError`] if the spec has no feature
    /// columns, or a layer error if the network cannot be built.
    pub fn from_spec(
        spec: &ModelSpec,
        outputs: usize,
        regularizer: Regularizer,
    ) -> ModelResult<Self> {
        if spec.columns().is_empty() {
            return Err(ModelError::ConfigError {
                message: format!("predictor {:?} has no feature columns", spec.name()),
            });
        }
        let inputs = spec.columns().len();

        let (network, optimizer_kind) = match spec {
            ModelSpec::Linear(linear) => {
                let dense = Dense::new_with_initializer(
                    inputs,
                    outputs,
                    Initializer::Zeros,
                    Initializer::Zeros,
                    linear.seed(),
                )
                .with_regularizer(regularizer);
                (Network::Linear(dense), linear.optimizer())
            }
            ModelSpec::Mlp(mlp) => {
                let mut network = MLP::new(
                    inputs,
                    mlp.network().hidden_dims(),
                    outputs,
                    ActivationType::ReLU,
                    mlp.seed(),
                )?;
                network.set_regularizer(regularizer);
                (Network::Mlp(network), mlp.optimizer())
            }
        };

        let schedule = spec.learning_rate();
        let optimizers = network
            .parameters()
            .iter()
            .map(|_| create_optimizer(optimizer_kind.config(schedule.initial())))
            .collect();

        Ok(Self {
            name: spec.name().to_string(),
            network,
            schedule,
            optimizers,
        })
    }

    /// Returns the predictor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the learning rate this predictor would use at `step`.
    pub fn learning_rate_at(&self, step: u64) -> f32 {
        self.schedule.at(step)
    }

    /// Computes logits without caching anything for a backward pass.
    pub fn forward(&self, features: &Tensor) -> ModelResult<Tensor> {
        self.network.forward(features)
    }

    /// Computes logits and caches intermediate activations for backprop.
    pub fn forward_train(&mut self, features: &Tensor) -> ModelResult<Tensor> {
        self.network.forward_train(features)
    }

    /// Propagates the shared loss gradient and stores parameter gradients.
    pub fn backward(&mut self, grad: &Tensor) -> ModelResult<()> {
        self.network.backward(grad)?;
        Ok(())
    }

    /// Returns the parameter gradients from the last backward pass.
    pub fn gradients(&self) -> Vec<&Tensor> {
        self.network.gradients()
    }

    /// Returns paired mutable parameter and gradient references.
    pub fn params_and_grads(&mut self) -> Vec<(&mut Tensor, &mut Tensor)> {
        self.network.params_and_grads()
    }

    /// Returns the predictor's parameter tensors.
    pub fn parameters(&self) -> Vec<&Tensor> {
        self.network.parameters()
    }

    /// Returns the weight penalty contributed by this predictor.
    pub fn regularization_loss(&self) -> f32 {
        self.network.regularization_loss()
    }

    /// Applies one optimizer update per parameter at the rate scheduled
    /// for `step`.
    pub fn apply_gradients(&mut self, step: u64) {
        let lr = self.schedule.at(step);
        let pairs = self.network.params_and_grads();
        for ((param, grad), optimizer) in pairs.into_iter().zip(self.optimizers.iter_mut()) {
            optimizer.set_learning_rate(lr);
            optimizer.apply_gradients(param.data_mut(), grad.data());
        }
    }

    /// Overwrites the predictor's parameters from a checkpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError::CheckpointMismatch`] if the tensor count or
    /// any tensor shape disagrees with the live model.
    pub fn set_parameters(&mut self, values: &[Tensor]) -> ModelResult<()> {
        let mut params = self.network.parameters_mut();
        if params.len() != values.len() {
            return Err(ModelError::CheckpointMismatch {
                message: format!(
                    "predictor {:?} has {} parameter tensors, checkpoint carries {}",
                    self.name,
                    params.len(),
                    values.len()
                ),
            });
        }
        for (param, value) in params.iter_mut().zip(values) {
            if param.shape() != value.shape() {
                return Err(ModelError::CheckpointMismatch {
                    message: format!(
                        "predictor {:?} expects shape {:?}, checkpoint carries {:?}",
                        self.name,
                        param.shape(),
                        value.shape()
                    ),
                });
            }
            **param = value.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{LinearSpec, MlpSpec, NetworkModel};
    use widedeep_data::Column;
    use widedeep_ops::OptimizerKind;

    fn columns(n: usize) -> Vec<Column> {
        (0..n).map(|i| Column::new(format!("f{}", i), i)).collect()
    }

    fn linear_predictor(inputs: usize, outputs: usize) -> Predictor {
        let spec = ModelSpec::Linear(LinearSpec::new(
            "linear",
            columns(inputs),
            OptimizerKind::Sgd,
            LearningRate::constant(0.1),
        ));
        Predictor::from_spec(&spec, outputs, Regularizer::None).unwrap()
    }

    #[test]
    fn test_linear_predictor_starts_at_zero_logits() {
        let predictor = linear_predictor(3, 4);
        let features = Tensor::from_data(&[2, 3], vec![1.0, -2.0, 0.5, 3.0, 0.0, 1.0]);
        let logits = predictor.forward(&features).unwrap();
        assert_eq!(logits.shape(), &[2, 4]);
        assert!(logits.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_mlp_predictor_shapes_and_optimizer_count() {
        let spec = ModelSpec::Mlp(MlpSpec::new(
            "mlp",
            columns(13),
            NetworkModel::Mlp,
            OptimizerKind::Momentum,
            LearningRate::constant(0.01),
        ));
        let predictor = Predictor::from_spec(&spec, 4, Regularizer::None).unwrap();

        // Hidden layers 64 and 32 plus the output layer, weights and bias each.
        assert_eq!(predictor.parameters().len(), 6);
        assert_eq!(predictor.optimizers.len(), 6);

        let features = Tensor::zeros(&[5, 13]);
        let logits = predictor.forward(&features).unwrap();
        assert_eq!(logits.shape(), &[5, 4]);
    }

    #[test]
    fn test_empty_columns_rejected() {
        let spec = ModelSpec::Linear(LinearSpec::new(
            "linear",
            Vec::new(),
            OptimizerKind::Sgd,
            LearningRate::constant(0.1),
        ));
        let err = Predictor::from_spec(&spec, 4, Regularizer::None).expect_err("no columns");
        assert!(matches!(err, ModelError::ConfigError { .. }));
    }

    #[test]
    fn test_apply_gradients_moves_parameters() {
        let mut predictor = linear_predictor(2, 2);
        let features = Tensor::from_data(&[1, 2], vec![1.0, 2.0]);
        let _ = predictor.forward_train(&features).unwrap();

        let grad = Tensor::from_data(&[1, 2], vec![1.0, -1.0]);
        predictor.backward(&grad).unwrap();
        predictor.apply_gradients(0);

        // dW = x^T @ grad, update = -0.1 * dW.
        let weights = predictor.parameters()[0].clone();
        assert!((weights.data()[0] - (-0.1)).abs() < 1e-6);
        assert!((weights.data()[1] - 0.1).abs() < 1e-6);
        assert!((weights.data()[2] - (-0.2)).abs() < 1e-6);
        assert!((weights.data()[3] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_scheduled_rate_decays_across_steps() {
        let spec = ModelSpec::Linear(LinearSpec::new(
            "linear",
            columns(2),
            OptimizerKind::Sgd,
            LearningRate::exponential(0.1, 10, 0.5).unwrap(),
        ));
        let predictor = Predictor::from_spec(&spec, 2, Regularizer::None).unwrap();
        assert!((predictor.learning_rate_at(0) - 0.1).abs() < 1e-7);
        assert!((predictor.learning_rate_at(10) - 0.05).abs() < 1e-7);
    }

    #[test]
    fn test_set_parameters_round_trip_and_mismatch() {
        let mut predictor = linear_predictor(2, 2);
        let replacement = vec![
            Tensor::from_data(&[2, 2], vec![1.0, 2.0, 3.0, 4.0]),
            Tensor::from_data(&[2], vec![0.5, -0.5]),
        ];
        predictor.set_parameters(&replacement).unwrap();
        assert_eq!(predictor.parameters()[0].data(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(predictor.parameters()[1].data(), &[0.5, -0.5]);

        let wrong_count = vec![Tensor::zeros(&[2, 2])];
        assert!(matches!(
            predictor.set_parameters(&wrong_count),
            Err(ModelError::CheckpointMismatch { .. })
        ));

        let wrong_shape = vec![Tensor::zeros(&[3, 2]), Tensor::zeros(&[2])];
        assert!(matches!(
            predictor.set_parameters(&wrong_shape),
            Err(ModelError::CheckpointMismatch { .. })
        ));
    }
}
