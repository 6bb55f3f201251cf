//! Feature column descriptors for the Boston housing dataset.

use serde::{Deserialize, Serialize};

/// The thirteen numeric feature columns, in canonical order.
pub const BOSTON_FEATURES: [&str; 13] = [
    "crim", "zn", "indus", "chas", "nox", "rm", "age", "dis", "rad", "tax", "ptratio", "b",
    "lstat",
];

/// The continuous target column quantized into class labels.
pub const BOSTON_TARGET: &str = "medv";

/// A numeric feature column resolved against a CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Canonical column name, lowercase.
    pub name: String,
    /// Position of the column within the CSV header.
    pub index: usize,
}

impl Column {
    /// Creates a column descriptor.
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_names_are_distinct() {
        let mut names = BOSTON_FEATURES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 13);
        assert!(!names.contains(&BOSTON_TARGET));
    }

    #[test]
    fn test_column_new() {
        let column = Column::new("crim", 0);
        assert_eq!(column.name, "crim");
        assert_eq!(column.index, 0);
    }
}
