//! The Boston housing dataset behind the [`DataSettings`] interface.
//!
//! Loads `boston.csv` (506 rows, 13 numeric features, continuous `medv`
//! target), quantizes the target into class buckets, z-score normalizes the
//! features with statistics from the training split only, and serves
//! mini-batches per split.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};
use widedeep_layers::tensor::Tensor;

use crate::batch::Batch;
use crate::columns::{Column, BOSTON_FEATURES, BOSTON_TARGET};
use crate::dataset::DataSettings;
use crate::error::{DataError, DataResult};
use crate::mode::DataMode;
use crate::quantize::Quantize;

/// File name expected when the data location is a directory.
const BOSTON_FILE: &str = "boston.csv";

/// Fraction of rows assigned to the training split, in tenths.
const TRAIN_TENTHS: usize = 8;

/// The Boston housing dataset with a quantized target.
///
/// Rows are shuffled once with the seed and split 80/20 into train and test.
/// Per-feature mean and standard deviation come from the training split only,
/// so the held-out split never leaks into normalization.
#[derive(Debug)]
pub struct BostonSettings {
    /// Quantization rule applied to the target column.
    quantizer: Quantize,
    /// Feature columns resolved against the CSV header, canonical order.
    columns: Vec<Column>,
    /// Normalized training examples.
    train: Vec<(Vec<f32>, usize)>,
    /// Normalized held-out examples, fixed order.
    test: Vec<(Vec<f32>, usize)>,
    /// Seed driving the split and the per-pass shuffles.
    seed: u64,
}

impl BostonSettings {
    /// Opens the dataset at `location`.
    ///
    /// `location` may be the CSV file itself or a directory containing
    /// `boston.csv`. The header row resolves column positions by name, so
    /// column order in the file is free.
    pub fn open<P: AsRef<Path>>(location: P, quantizer: Quantize, seed: u64) -> DataResult<Self> {
        quantizer.validate()?;

        let location = location.as_ref();
        let path = if location.is_dir() {
            location.join(BOSTON_FILE)
        } else {
            location.to_path_buf()
        };

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(DataError::EmptyDataset { path }),
        };
        let (columns, target_index) = resolve_columns(&header)?;

        let mut rows: Vec<(Vec<f32>, f32)> = Vec::new();
        for (i, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let line_number = i + 2;
            let fields: Vec<&str> = line.split(',').collect();

            let mut features = Vec::with_capacity(columns.len());
            for column in &columns {
                features.push(parse_field(&fields, column.index, line_number)?);
            }
            let target = parse_field(&fields, target_index, line_number)?;
            rows.push((features, target));
        }

        if rows.is_empty() {
            return Err(DataError::EmptyDataset { path });
        }

        Ok(Self::from_rows(rows, columns, quantizer, seed, &path))
    }

    /// Splits, normalizes, and quantizes parsed rows.
    fn from_rows(
        rows: Vec<(Vec<f32>, f32)>,
        columns: Vec<Column>,
        quantizer: Quantize,
        seed: u64,
        path: &Path,
    ) -> Self {
        let mut indices: Vec<usize> = (0..rows.len()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let train_count = rows.len() * TRAIN_TENTHS / 10;
        let (means, stds) = feature_stats(&rows, &indices[..train_count], columns.len());

        let normalize = |index: usize| -> (Vec<f32>, usize) {
            let (features, target) = &rows[index];
            let normalized = features
                .iter()
                .zip(means.iter().zip(stds.iter()))
                .map(|(x, (mean, std))| (x - mean) / std)
                .collect();
            (normalized, quantizer.bucketize(*target))
        };

        let train: Vec<_> = indices[..train_count].iter().map(|&i| normalize(i)).collect();
        let test: Vec<_> = indices[train_count..].iter().map(|&i| normalize(i)).collect();

        if train.is_empty() || test.is_empty() {
            warn!(
                "Dataset {:?} has only {} rows, one split is empty",
                path,
                rows.len()
            );
        }
        info!(
            "Loaded {} rows from {:?} ({} train / {} test, {} classes)",
            rows.len(),
            path,
            train.len(),
            test.len(),
            quantizer.num_classes()
        );

        Self {
            quantizer,
            columns,
            train,
            test,
            seed,
        }
    }

    /// Returns the quantizer in use.
    pub fn quantizer(&self) -> &Quantize {
        &self.quantizer
    }

    /// Returns the number of training examples.
    pub fn train_len(&self) -> usize {
        self.train.len()
    }

    /// Returns the number of held-out examples.
    pub fn test_len(&self) -> usize {
        self.test.len()
    }
}

impl DataSettings for BostonSettings {
    fn wide_columns(&self) -> &[Column] {
        &self.columns
    }

    fn num_classes(&self) -> usize {
        self.quantizer.num_classes()
    }

    fn batches(&self, mode: DataMode, batch_size: usize, pass: u64) -> DataResult<Vec<Batch>> {
        if batch_size == 0 {
            return Err(DataError::ConfigError {
                message: "batch_size must be positive".to_string(),
            });
        }

        let examples = match mode {
            DataMode::Train => &self.train,
            DataMode::Test => &self.test,
        };

        let mut indices: Vec<usize> = (0..examples.len()).collect();
        if mode == DataMode::Train {
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(pass));
            indices.shuffle(&mut rng);
        }

        let num_features = self.columns.len();
        let batches = indices
            .chunks(batch_size)
            .map(|chunk| {
                let mut data = Vec::with_capacity(chunk.len() * num_features);
                let mut labels = Vec::with_capacity(chunk.len());
                for &i in chunk {
                    let (features, label) = &examples[i];
                    data.extend_from_slice(features);
                    labels.push(*label);
                }
                let features = Tensor::from_data(&[chunk.len(), num_features], data);
                Batch::new(features, labels)
            })
            .collect();

        Ok(batches)
    }
}

/// Resolves the canonical feature columns and the target position by name.
fn resolve_columns(header: &str) -> DataResult<(Vec<Column>, usize)> {
    let names: Vec<String> = header
        .split(',')
        .map(|field| field.trim().to_lowercase())
        .collect();

    let mut columns = Vec::with_capacity(BOSTON_FEATURES.len());
    for feature in BOSTON_FEATURES {
        let index = names
            .iter()
            .position(|name| name == feature)
            .ok_or_else(|| DataError::MissingColumn {
                name: feature.to_string(),
            })?;
        columns.push(Column::new(feature, index));
    }

    let target_index =
        names
            .iter()
            .position(|name| name == BOSTON_TARGET)
            .ok_or_else(|| DataError::MissingColumn {
                name: BOSTON_TARGET.to_string(),
            })?;

    Ok((columns, target_index))
}

fn parse_field(fields: &[&str], index: usize, line_number: usize) -> DataResult<f32> {
    let raw = fields.get(index).ok_or_else(|| DataError::Parse {
        line: line_number,
        message: format!("missing field {}", index),
    })?;
    raw.trim().parse::<f32>().map_err(|e| DataError::Parse {
        line: line_number,
        message: format!("invalid number {:?}: {}", raw.trim(), e),
    })
}

/// Per-feature mean and standard deviation over the training rows.
///
/// Zero-variance columns get a standard deviation of one, so constant
/// features normalize to zero.
fn feature_stats(
    rows: &[(Vec<f32>, f32)],
    train_indices: &[usize],
    num_features: usize,
) -> (Vec<f32>, Vec<f32>) {
    let n = train_indices.len().max(1) as f32;

    let mut means = vec![0.0f32; num_features];
    for &i in train_indices {
        for (j, x) in rows[i].0.iter().enumerate() {
            means[j] += x;
        }
    }
    for mean in means.iter_mut() {
        *mean /= n;
    }

    let mut stds = vec![0.0f32; num_features];
    for &i in train_indices {
        for (j, x) in rows[i].0.iter().enumerate() {
            stds[j] += (x - means[j]).powi(2);
        }
    }
    for std in stds.iter_mut() {
        *std = (*std / n).sqrt();
        if *std < 1e-8 {
            *std = 1.0;
        }
    }

    (means, stds)
}
