//! Dataset split selection.

/// Which split of the dataset a run reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    /// The training split, reshuffled each pass.
    Train,
    /// The held-out split, served in a fixed order.
    Test,
}
