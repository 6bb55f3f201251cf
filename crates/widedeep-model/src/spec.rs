//! Predictor specifications and the training-mode dispatch.
//!
//! A [`ModelSpec`] describes one predictor before it is built: which feature
//! columns it reads, which optimizer updates it, and on what learning-rate
//! schedule. [`TrainMode`] maps the user-facing mode choice onto the set of
//! specs the joint classifier is built from.

use serde::{Deserialize, Serialize};
use widedeep_data::Column;
use widedeep_ops::{LearningRate, OptimizerKind};

/// Default initialization seed when a spec does not override it.
pub const DEFAULT_SEED: u64 = 42;

/// Which predictors participate in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainMode {
    /// Linear predictor only.
    Wide,
    /// MLP predictor only.
    Deep,
    /// Linear and MLP predictors trained jointly.
    WideAndDeep,
}

impl TrainMode {
    /// Maps the mode onto the predictor specs it selects.
    ///
    /// `Wide` selects the linear spec, `Deep` the MLP spec, and
    /// `WideAndDeep` both with the linear predictor first.
    ///
    /// # Examples
    ///
    /// ```
    /// use widedeep_model::spec::{LinearSpec, MlpSpec, NetworkModel, TrainMode};
    /// use widedeep_ops::{LearningRate, OptimizerKind};
    ///
    /// let linear = LinearSpec::new("linear", Vec::new(), OptimizerKind::Sgd, LearningRate::constant(0.01));
    /// let mlp = MlpSpec::new(
    ///     "mlp",
    ///     Vec::new(),
    ///     NetworkModel::Mlp,
    ///     OptimizerKind::Sgd,
    ///     LearningRate::constant(0.01),
    /// );
    ///
    /// let specs = TrainMode::WideAndDeep.selected_specs(linear, mlp);
    /// assert_eq!(specs.len(), 2);
    /// ```
    pub fn selected_specs(self, linear: LinearSpec, mlp: MlpSpec) -> Vec<ModelSpec> {
        match self {
            TrainMode::Wide => vec![ModelSpec::Linear(linear)],
            TrainMode::Deep => vec![ModelSpec::Mlp(mlp)],
            TrainMode::WideAndDeep => vec![ModelSpec::Linear(linear), ModelSpec::Mlp(mlp)],
        }
    }
}

/// Hidden-layer catalog for the MLP predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NetworkModel {
    /// Two ReLU hidden layers of 64 and 32 units.
    #[default]
    Mlp,
    /// Three ReLU hidden layers of 128, 64, and 32 units.
    MlpDeep,
}

impl NetworkModel {
    /// Returns the hidden-layer widths for this network.
    pub fn hidden_dims(self) -> &'static [usize] {
        match self {
            NetworkModel::Mlp => &[64, 32],
            NetworkModel::MlpDeep => &[128, 64, 32],
        }
    }
}

/// Specification for the linear (wide) predictor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSpec {
    name: String,
    columns: Vec<Column>,
    optimizer: OptimizerKind,
    learning_rate: LearningRate,
    seed: u64,
}

impl LinearSpec {
    /// Creates a linear predictor spec over the given feature columns.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<Column>,
        optimizer: OptimizerKind,
        learning_rate: LearningRate,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            optimizer,
            learning_rate,
            seed: DEFAULT_SEED,
        }
    }

    /// Sets the initialization seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the predictor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the feature columns this predictor reads.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the optimizer choice.
    pub fn optimizer(&self) -> OptimizerKind {
        self.optimizer
    }

    /// Returns the learning-rate schedule.
    pub fn learning_rate(&self) -> LearningRate {
        self.learning_rate
    }

    /// Returns the initialization seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Specification for the MLP (deep) predictor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpSpec {
    name: String,
    columns: Vec<Column>,
    network: NetworkModel,
    optimizer: OptimizerKind,
    learning_rate: LearningRate,
    seed: u64,
}

impl MlpSpec {
    /// Creates an MLP predictor spec over the given feature columns.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<Column>,
        network: NetworkModel,
        optimizer: OptimizerKind,
        learning_rate: LearningRate,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            network,
            optimizer,
            learning_rate,
            seed: DEFAULT_SEED,
        }
    }

    /// Sets the initialization seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the predictor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the feature columns this predictor reads.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the hidden-layer catalog entry.
    pub fn network(&self) -> NetworkModel {
        self.network
    }

    /// Returns the optimizer choice.
    pub fn optimizer(&self) -> OptimizerKind {
        self.optimizer
    }

    /// Returns the learning-rate schedule.
    pub fn learning_rate(&self) -> LearningRate {
        self.learning_rate
    }

    /// Returns the initialization seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// A predictor specification of either kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ModelSpec {
    /// Linear predictor spec.
    Linear(LinearSpec),
    /// MLP predictor spec.
    Mlp(MlpSpec),
}

impl ModelSpec {
    /// Returns the predictor name.
    pub fn name(&self) -> &str {
        match self {
            ModelSpec::Linear(spec) => spec.name(),
            ModelSpec::Mlp(spec) => spec.name(),
        }
    }

    /// Returns the feature columns this predictor reads.
    pub fn columns(&self) -> &[Column] {
        match self {
            ModelSpec::Linear(spec) => spec.columns(),
            ModelSpec::Mlp(spec) => spec.columns(),
        }
    }

    /// Returns the learning-rate schedule.
    pub fn learning_rate(&self) -> LearningRate {
        match self {
            ModelSpec::Linear(spec) => spec.learning_rate(),
            ModelSpec::Mlp(spec) => spec.learning_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boston_columns() -> Vec<Column> {
        vec![Column::new("crim", 0), Column::new("zn", 1)]
    }

    fn linear_spec() -> LinearSpec {
        LinearSpec::new(
            "linear",
            boston_columns(),
            OptimizerKind::Sgd,
            LearningRate::constant(0.01),
        )
    }

    fn mlp_spec() -> MlpSpec {
        MlpSpec::new(
            "mlp",
            boston_columns(),
            NetworkModel::Mlp,
            OptimizerKind::Sgd,
            LearningRate::constant(0.01),
        )
    }

    #[test]
    fn test_wide_selects_linear_only() {
        let specs = TrainMode::Wide.selected_specs(linear_spec(), mlp_spec());
        assert_eq!(specs.len(), 1);
        assert!(matches!(&specs[0], ModelSpec::Linear(s) if s.name() == "linear"));
    }

    #[test]
    fn test_deep_selects_mlp_only() {
        let specs = TrainMode::Deep.selected_specs(linear_spec(), mlp_spec());
        assert_eq!(specs.len(), 1);
        assert!(matches!(&specs[0], ModelSpec::Mlp(s) if s.name() == "mlp"));
    }

    #[test]
    fn test_wide_and_deep_selects_both_linear_first() {
        let specs = TrainMode::WideAndDeep.selected_specs(linear_spec(), mlp_spec());
        assert_eq!(specs.len(), 2);
        assert!(matches!(&specs[0], ModelSpec::Linear(_)));
        assert!(matches!(&specs[1], ModelSpec::Mlp(_)));
    }

    #[test]
    fn test_network_hidden_dims() {
        assert_eq!(NetworkModel::Mlp.hidden_dims(), &[64, 32]);
        assert_eq!(NetworkModel::MlpDeep.hidden_dims(), &[128, 64, 32]);
    }

    #[test]
    fn test_spec_accessors() {
        let spec = linear_spec().with_seed(7);
        assert_eq!(spec.name(), "linear");
        assert_eq!(spec.columns().len(), 2);
        assert_eq!(spec.optimizer(), OptimizerKind::Sgd);
        assert_eq!(spec.seed(), 7);

        let spec = mlp_spec();
        assert_eq!(spec.network(), NetworkModel::Mlp);
        assert_eq!(spec.seed(), DEFAULT_SEED);
    }

    #[test]
    fn test_model_spec_delegation() {
        let spec = ModelSpec::Mlp(mlp_spec());
        assert_eq!(spec.name(), "mlp");
        assert_eq!(spec.columns().len(), 2);
        assert_eq!(spec.learning_rate().initial(), 0.01);
    }
}
