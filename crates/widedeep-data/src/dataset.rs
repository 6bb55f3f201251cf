//! The dataset interface the model layer trains and evaluates against.

use crate::batch::Batch;
use crate::columns::Column;
use crate::error::DataResult;
use crate::mode::DataMode;

/// A classification dataset serving normalized feature batches.
///
/// The model layer depends on this trait rather than any concrete dataset,
/// so alternative data sources can be swapped in behind the same train and
/// evaluate flow.
pub trait DataSettings {
    /// Feature columns served to wide (linear) predictors, canonical order.
    fn wide_columns(&self) -> &[Column];

    /// Number of target classes after quantization.
    fn num_classes(&self) -> usize;

    /// Number of feature columns per example.
    fn num_features(&self) -> usize {
        self.wide_columns().len()
    }

    /// Materializes the batches for one pass over a split.
    ///
    /// Train passes reshuffle with a pass-specific seed; test passes are
    /// served in a fixed order. The final batch may be short rather than
    /// dropped.
    fn batches(&self, mode: DataMode, batch_size: usize, pass: u64) -> DataResult<Vec<Batch>>;
}
