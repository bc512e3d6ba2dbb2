//! Result type for a single greedy run.

/// Outcome of one greedy selection run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    /// Objective score of the final selection. `0` is optimal.
    pub score: f64,

    /// Selected row identifiers, ascending, exactly `k` of them.
    pub indices: Vec<usize>,

    /// Achieved attribute means of the selected rows.
    pub achieved: Vec<f64>,
}

impl RunResult {
    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the selection is empty. Never true for a completed run.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Consumes the result into the `(score, indices)` pair.
    pub fn into_pair(self) -> (f64, Vec<usize>) {
        (self.score, self.indices)
    }
}
