//! Dataset loading, quantization, and mini-batching for wide-and-deep
//! classification.
//!
//! The crate turns the Boston housing regression table into a classification
//! dataset: the continuous `medv` target is bucketized by a [`Quantize`] rule,
//! features are z-score normalized with statistics from the training split
//! only, and batches are served per [`DataMode`] through the [`DataSettings`]
//! trait the model layer trains against.
//!
//! # Quick Start
//!
//! ```
//! use widedeep_data::Quantize;
//!
//! let quantizer = Quantize::new(vec![20.0, 40.0, 60.0], 32);
//! quantizer.validate().unwrap();
//! assert_eq!(quantizer.num_classes(), 4);
//! assert_eq!(quantizer.bucketize(24.0), 1);
//! ```
//!
//! # Loading the dataset
//!
//! ```no_run
//! use widedeep_data::{BostonSettings, DataMode, DataSettings, Quantize};
//!
//! let quantizer = Quantize::new(vec![20.0, 40.0, 60.0], 32);
//! let dataset = BostonSettings::open("data/boston", quantizer, 42).unwrap();
//! for batch in dataset.batches(DataMode::Train, 32, 0).unwrap() {
//!     assert_eq!(batch.features().shape()[1], dataset.num_features());
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod batch;
pub mod boston;
pub mod columns;
pub mod dataset;
pub mod error;
pub mod mode;
pub mod quantize;

pub use batch::Batch;
pub use boston::BostonSettings;
pub use columns::{Column, BOSTON_FEATURES, BOSTON_TARGET};
pub use dataset::DataSettings;
pub use error::{DataError, DataResult};
pub use mode::DataMode;
pub use quantize::Quantize;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::batch::Batch;
    pub use crate::boston::BostonSettings;
    pub use crate::columns::{Column, BOSTON_FEATURES, BOSTON_TARGET};
    pub use crate::dataset::DataSettings;
    pub use crate::error::{DataError, DataResult};
    pub use crate::mode::DataMode;
    pub use crate::quantize::Quantize;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_full_pipeline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("boston.csv");
        let mut contents =
            String::from("crim,zn,indus,chas,nox,rm,age,dis,rad,tax,ptratio,b,lstat,medv\n");
        for i in 0..20 {
            let row: Vec<String> = (0..13).map(|j| format!("{}", i * 13 + j)).collect();
            contents.push_str(&format!("{},{}\n", row.join(","), 5.0 + i as f32 * 4.0));
        }
        std::fs::write(&path, contents).unwrap();

        let quantizer = Quantize::new(vec![20.0, 40.0, 60.0], 4);
        let dataset = BostonSettings::open(dir.path(), quantizer, 42).unwrap();

        assert_eq!(dataset.train_len(), 16);
        assert_eq!(dataset.test_len(), 4);
        assert_eq!(dataset.num_classes(), 4);

        let mut seen = 0;
        for batch in dataset.batches(DataMode::Train, 5, 0).unwrap() {
            assert_eq!(batch.features().shape()[1], 13);
            assert!(batch.labels().iter().all(|&l| l < 4));
            seen += batch.len();
        }
        assert_eq!(seen, 16);
    }
}
