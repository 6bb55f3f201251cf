//! Wide, deep, and wide-and-deep classifiers with training, evaluation,
//! and checkpointing.
//!
//! A [`TrainMode`] picks which predictor specs take part: the wide part is
//! a linear model over the feature columns, the deep part an MLP, and the
//! joint mode runs both. The [`JointClassifier`] sums the predictors'
//! logits into one score per class and trains them against a shared loss,
//! writing JSON checkpoints and summary rows under its model directory as
//! it goes.
//!
//! # Quick Start
//!
//! ```
//! use widedeep_data::Column;
//! use widedeep_model::{JointClassifier, LinearSpec, MlpSpec, NetworkModel, TrainMode};
//! use widedeep_ops::{CrossEntropy, LearningRate, OptimizerKind};
//!
//! let columns = vec![Column::new("rm", 0), Column::new("age", 1)];
//! let specs = TrainMode::WideAndDeep.selected_specs(
//!     LinearSpec::new(
//!         "linear",
//!         columns.clone(),
//!         OptimizerKind::Sgd,
//!         LearningRate::constant(0.01),
//!     ),
//!     MlpSpec::new(
//!         "mlp",
//!         columns,
//!         NetworkModel::Mlp,
//!         OptimizerKind::Sgd,
//!         LearningRate::constant(0.01),
//!     ),
//! );
//!
//! let model = JointClassifier::new(
//!     "models/boston",
//!     4,
//!     specs,
//!     None,
//!     None,
//!     Box::new(CrossEntropy::new()),
//!     None,
//! )
//! .unwrap();
//! assert_eq!(model.predictor_names(), ["linear", "mlp"]);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod checkpoint;
pub mod error;
pub mod joint;
pub mod metrics;
pub mod predictor;
pub mod spec;
pub mod summary;

pub use checkpoint::{
    latest_checkpoint, restore_checkpoint, CheckpointManager, CheckpointPayload, PredictorState,
};
pub use error::{ModelError, ModelResult};
pub use joint::{
    apply_gpu_fraction, EvalOptions, EvalReport, JointClassifier, TrainOptions, TrainReport,
};
pub use metrics::{Metrics, MetricsRecorder};
pub use predictor::Predictor;
pub use spec::{LinearSpec, MlpSpec, ModelSpec, NetworkModel, TrainMode, DEFAULT_SEED};
pub use summary::{SummaryRow, SummaryWriter};

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::checkpoint::{latest_checkpoint, CheckpointManager, CheckpointPayload};
    pub use crate::error::{ModelError, ModelResult};
    pub use crate::joint::{
        apply_gpu_fraction, EvalOptions, EvalReport, JointClassifier, TrainOptions, TrainReport,
    };
    pub use crate::metrics::Metrics;
    pub use crate::spec::{LinearSpec, MlpSpec, ModelSpec, NetworkModel, TrainMode};
    pub use crate::summary::{SummaryRow, SummaryWriter};
}
