//! Command-line driver for the wide-and-deep Boston housing classifier.
//!
//! One flag surface selects the training mode (wide, deep, or both), the
//! data and model directories, batch and cadence settings, and the
//! per-predictor learning rate schedules. With `--training` the run trains
//! for `--steps` steps, checkpointing as it goes; without it the latest
//! checkpoint is evaluated on the test split.
//!
//! # Example
//!
//! ```bash
//! # Train the joint model
//! widedeep --training --mode wide-and-deep --data-location data/boston
//!
//! # Evaluate the latest checkpoint
//! widedeep --mode wide-and-deep --data-location data/boston
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use widedeep_data::{BostonSettings, DataSettings, Quantize};
use widedeep_model::{
    apply_gpu_fraction, EvalOptions, EvalReport, JointClassifier, LinearSpec, MlpSpec,
    NetworkModel, TrainMode, TrainOptions, TrainReport,
};
use widedeep_ops::{
    Accuracy, AccuracyMode, AccuracyRandom, CrossEntropy, LearningRate, Metric, OptimizerKind,
};

/// Bucket edges quantizing the continuous `medv` target into classes.
const TARGET_EDGES: [f32; 3] = [20.0, 40.0, 60.0];

/// Classify Boston housing prices with wide, deep, or wide-and-deep models
///
/// Trains or evaluates a joint classifier over the 13 Boston housing
/// features. Checkpoints and summary rows land under `--model-dir`.
#[derive(Parser, Debug, Clone)]
#[command(name = "widedeep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory (or file) holding the Boston housing CSV
    #[arg(long, env = "WIDEDEEP_DATA_LOCATION", default_value = "data/boston")]
    pub data_location: PathBuf,

    /// Directory for checkpoints and summary rows
    #[arg(long, env = "WIDEDEEP_MODEL_DIR", default_value = "models/boston")]
    pub model_dir: PathBuf,

    /// Examples per batch
    #[arg(long, default_value = "32")]
    pub batch_size: usize,

    /// Append a summary row every N steps
    #[arg(long, default_value = "50")]
    pub summaries: u64,

    /// Write a checkpoint every N steps
    #[arg(long, default_value = "100")]
    pub checkpoints: u64,

    /// Number of training steps
    #[arg(long, default_value = "5000")]
    pub steps: u64,

    /// Accelerator memory fraction hint in (0, 1]
    #[arg(long, default_value = "0.70")]
    pub gpu_frac: f32,

    /// Which predictors take part
    #[arg(long, value_enum, default_value = "deep")]
    pub mode: ModeArg,

    /// Train when set; evaluate the latest checkpoint otherwise
    #[arg(long, default_value = "false")]
    pub training: bool,

    /// L1 regularization strength shared by all predictors
    #[arg(long)]
    pub l1_regularization: Option<f32>,

    /// L2 regularization strength shared by all predictors
    #[arg(long)]
    pub l2_regularization: Option<f32>,

    /// Global-norm gradient clipping threshold
    #[arg(long)]
    pub gradient_clip: Option<f32>,

    /// Initial learning rate of the linear predictor
    #[arg(long, default_value = "0.01")]
    pub linear_initial_lr: f32,

    /// Decay interval of the linear predictor, in steps
    #[arg(long)]
    pub linear_decay_steps: Option<usize>,

    /// Decay rate of the linear predictor
    #[arg(long)]
    pub linear_decay_rate: Option<f32>,

    /// Initial learning rate of the MLP predictor
    #[arg(long, default_value = "0.01")]
    pub mlp_initial_lr: f32,

    /// Decay interval of the MLP predictor, in steps
    #[arg(long, default_value = "10000")]
    pub mlp_decay_steps: usize,

    /// Decay rate of the MLP predictor
    #[arg(long, default_value = "0.5")]
    pub mlp_decay_rate: f32,

    /// Hidden stack of the deep predictor
    #[arg(long, value_enum, default_value = "mlp")]
    pub mlp_network: NetworkArg,

    /// Seed for parameter initialization and the train/test split
    #[arg(long, default_value = "42")]
    pub seed: u64,
}

/// Training mode flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Linear predictor over the raw feature columns
    Wide,
    /// MLP predictor
    Deep,
    /// Both predictors with summed logits
    WideAndDeep,
}

impl From<ModeArg> for TrainMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Wide => TrainMode::Wide,
            ModeArg::Deep => TrainMode::Deep,
            ModeArg::WideAndDeep => TrainMode::WideAndDeep,
        }
    }
}

/// Deep network flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NetworkArg {
    /// Hidden layers of 64 and 32 units
    Mlp,
    /// Hidden layers of 128, 64, and 32 units
    MlpDeep,
}

impl From<NetworkArg> for NetworkModel {
    fn from(network: NetworkArg) -> Self {
        match network {
            NetworkArg::Mlp => NetworkModel::Mlp,
            NetworkArg::MlpDeep => NetworkModel::MlpDeep,
        }
    }
}

/// Resolved run configuration.
///
/// Built once from the parsed flags and never modified afterwards; the flag
/// mirrors are already converted to library enums.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory (or file) holding the Boston housing CSV.
    pub data_location: PathBuf,
    /// Directory for checkpoints and summary rows.
    pub model_dir: PathBuf,
    /// Examples per batch.
    pub batch_size: usize,
    /// Summary cadence in steps.
    pub summaries: u64,
    /// Checkpoint cadence in steps.
    pub checkpoints: u64,
    /// Number of training steps.
    pub steps: u64,
    /// Accelerator memory fraction hint.
    pub gpu_frac: f32,
    /// Which predictors take part.
    pub mode: TrainMode,
    /// Train when true; evaluate otherwise.
    pub training: bool,
    /// L1 regularization strength shared by all predictors.
    pub l1_regularization: Option<f32>,
    /// L2 regularization strength shared by all predictors.
    pub l2_regularization: Option<f32>,
    /// Global-norm gradient clipping threshold.
    pub gradient_clip: Option<f32>,
    /// Initial learning rate of the linear predictor.
    pub linear_initial_lr: f32,
    /// Decay interval of the linear predictor.
    pub linear_decay_steps: Option<usize>,
    /// Decay rate of the linear predictor.
    pub linear_decay_rate: Option<f32>,
    /// Initial learning rate of the MLP predictor.
    pub mlp_initial_lr: f32,
    /// Decay interval of the MLP predictor.
    pub mlp_decay_steps: usize,
    /// Decay rate of the MLP predictor.
    pub mlp_decay_rate: f32,
    /// Hidden stack of the deep predictor.
    pub mlp_network: NetworkModel,
    /// Seed for parameter initialization and the train/test split.
    pub seed: u64,
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        Self {
            data_location: cli.data_location,
            model_dir: cli.model_dir,
            batch_size: cli.batch_size,
            summaries: cli.summaries,
            checkpoints: cli.checkpoints,
            steps: cli.steps,
            gpu_frac: cli.gpu_frac,
            mode: cli.mode.into(),
            training: cli.training,
            l1_regularization: cli.l1_regularization,
            l2_regularization: cli.l2_regularization,
            gradient_clip: cli.gradient_clip,
            linear_initial_lr: cli.linear_initial_lr,
            linear_decay_steps: cli.linear_decay_steps,
            linear_decay_rate: cli.linear_decay_rate,
            mlp_initial_lr: cli.mlp_initial_lr,
            mlp_decay_steps: cli.mlp_decay_steps,
            mlp_decay_rate: cli.mlp_decay_rate,
            mlp_network: cli.mlp_network.into(),
            seed: cli.seed,
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The run trained and checkpointed the model.
    Trained(TrainReport),
    /// The run evaluated the latest checkpoint.
    Evaluated(EvalReport),
}

/// Result type alias for CLI operations
pub type CliResult<T> = anyhow::Result<T>;

/// The metric list every run reports, in a fixed order.
pub fn default_metrics(num_classes: usize) -> Vec<Box<dyn Metric>> {
    vec![
        Box::new(Accuracy::new()),
        Box::new(AccuracyRandom::new(num_classes)),
        Box::new(AccuracyMode::new()),
    ]
}

/// Runs one training or evaluation pass per the config.
pub fn run(config: &RunConfig) -> CliResult<RunOutcome> {
    apply_gpu_fraction(config.gpu_frac)?;

    let quantizer = Quantize::new(TARGET_EDGES.to_vec(), config.batch_size);
    quantizer.validate()?;
    let num_classes = quantizer.num_classes();

    let dataset = BostonSettings::open(&config.data_location, quantizer, config.seed)
        .with_context(|| format!("failed to open dataset at {:?}", config.data_location))?;
    let columns = dataset.wide_columns().to_vec();
    info!(
        "Wide columns: {}",
        columns
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let linear_schedule = LearningRate::from_flags(
        config.linear_initial_lr,
        config.linear_decay_steps,
        config.linear_decay_rate,
    )?;
    let mlp_schedule = LearningRate::from_flags(
        config.mlp_initial_lr,
        Some(config.mlp_decay_steps),
        Some(config.mlp_decay_rate),
    )?;

    let specs = config.mode.selected_specs(
        LinearSpec::new("linear", columns.clone(), OptimizerKind::Sgd, linear_schedule)
            .with_seed(config.seed),
        MlpSpec::new(
            "mlp",
            columns,
            config.mlp_network,
            OptimizerKind::Sgd,
            mlp_schedule,
        )
        .with_seed(config.seed.wrapping_add(1)),
    );

    let mut model = JointClassifier::new(
        &config.model_dir,
        num_classes,
        specs,
        config.l1_regularization,
        config.l2_regularization,
        Box::new(CrossEntropy::new()),
        config.gradient_clip,
    )?;
    info!(
        "Built {:?} classifier with predictors [{}]",
        config.mode,
        model.predictor_names().join(", ")
    );

    let metrics = default_metrics(num_classes);

    if config.training {
        let options = TrainOptions::new(config.steps, config.batch_size)
            .with_track_summaries(config.summaries)
            .with_track_models(config.checkpoints);
        let report = model.train(&dataset, &options, &metrics)?;
        info!(
            "Training report: final loss {:.6} at step {}",
            report.final_loss, report.final_step
        );
        Ok(RunOutcome::Trained(report))
    } else {
        let options = EvalOptions::new(config.batch_size);
        let report = model.evaluate(&dataset, &options, &metrics)?;
        info!("Evaluation report: {}", report);
        Ok(RunOutcome::Evaluated(report))
    }
}
