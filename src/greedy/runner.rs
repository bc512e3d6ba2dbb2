//! Greedy selection loop.
//!
//! # Algorithm
//!
//! 1. Seed the selection with the pre-selected rows, or one random row
//! 2. While `|S| < k`:
//!    a. For every unselected row `e`, score `S + {e}` from the running
//!    column sums: `p'_j = (sum_j + x_ej) / (|S| + 1)`
//!    b. Gain is `score(S + {e}) - score(S)`
//!    c. Add the row with the largest gain (lowest index on ties)
//! 3. Return the final score and the ascending row indices
//!
//! Because attributes are binary, each `p'_j` takes one of two values per
//! step. Both per-attribute terms are computed once per step and every
//! candidate is scored by picking one of them per attribute, so a step
//! costs `O(n * f)` additions and only `O(f)` logarithms.

use super::types::RunResult;
use crate::config::{distinct_sorted, SelectionConfig};
use crate::error::Result;
use crate::matrix::AttributeMatrix;
use crate::objective::{binary_kl, score_unchecked};
use rand::Rng;
use tracing::{debug, trace};

/// Executes one greedy selection run.
pub struct GreedySelector;

impl GreedySelector {
    /// Runs one greedy selection of `k` rows.
    ///
    /// Without pre-selects, the seed row is drawn uniformly from `rng`.
    /// With pre-selects, `rng` is not touched and the run is deterministic.
    ///
    /// # Errors
    /// Any validation error from [`SelectionConfig::validate_selection`],
    /// raised before any selection work.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_entrofy::{AttributeMatrix, GreedySelector, SelectionConfig};
    /// use u_entrofy::random::create_rng;
    ///
    /// let x = AttributeMatrix::from_fn(6, 1, |i, _| i < 3);
    /// let config = SelectionConfig::default().with_pre_selects(vec![0]);
    /// let result = GreedySelector::run(&x, 2, &config, &mut create_rng(1)).unwrap();
    ///
    /// // Row 0 has the attribute; the best partner for a 0.5 target lacks it.
    /// assert_eq!(result.indices, vec![0, 3]);
    /// assert!(result.score.abs() < 1e-12);
    /// ```
    pub fn run<R: Rng>(
        matrix: &AttributeMatrix,
        k: usize,
        config: &SelectionConfig,
        rng: &mut R,
    ) -> Result<RunResult> {
        config.validate_selection(matrix.n_rows(), matrix.n_attributes(), k)?;

        let weights = config.resolved_weights(matrix.n_attributes());
        let target = config.resolved_target(matrix.n_attributes());
        Ok(Self::run_validated(
            matrix,
            k,
            &weights,
            &target,
            config.pre_selects.as_deref(),
            rng,
        ))
    }

    /// Runs on inputs that already passed validation.
    pub(crate) fn run_validated<R: Rng>(
        matrix: &AttributeMatrix,
        k: usize,
        weights: &[f64],
        target: &[f64],
        pre_selects: Option<&[usize]>,
        rng: &mut R,
    ) -> RunResult {
        let n = matrix.n_rows();

        if k == n {
            let indices: Vec<usize> = (0..n).collect();
            let achieved = matrix.column_means(&indices);
            let score = score_unchecked(&achieved, weights, target);
            debug!(event = "greedy_full_population", n, score);
            return RunResult {
                score,
                indices,
                achieved,
            };
        }

        let seed_rows = match pre_selects {
            Some(rows) => distinct_sorted(rows),
            None => vec![rng.random_range(0..n)],
        };
        debug!(event = "greedy_start", k, seed_rows = ?seed_rows);

        let mut state = SelectionState::new(matrix);
        for &row in &seed_rows {
            state.add(matrix, row);
        }

        while state.size < k {
            let (row, gain) = state.best_addition(matrix, weights, target);
            state.add(matrix, row);
            trace!(event = "greedy_step", size = state.size, row, gain);
        }

        let achieved = state.means();
        let score = score_unchecked(&achieved, weights, target);
        debug!(event = "greedy_end", k, score);

        RunResult {
            score,
            indices: state.indices(),
            achieved,
        }
    }
}

/// Mask and running column sums of one run.
struct SelectionState {
    selected: Vec<bool>,
    sums: Vec<usize>,
    size: usize,
}

impl SelectionState {
    fn new(matrix: &AttributeMatrix) -> Self {
        Self {
            selected: vec![false; matrix.n_rows()],
            sums: vec![0; matrix.n_attributes()],
            size: 0,
        }
    }

    fn add(&mut self, matrix: &AttributeMatrix, row: usize) {
        debug_assert!(!self.selected[row], "row {row} selected twice");
        self.selected[row] = true;
        for (s, &x) in self.sums.iter_mut().zip(matrix.row(row)) {
            *s += usize::from(x);
        }
        self.size += 1;
    }

    fn means(&self) -> Vec<f64> {
        if self.size == 0 {
            return vec![0.0; self.sums.len()];
        }
        let size = self.size as f64;
        self.sums.iter().map(|&s| s as f64 / size).collect()
    }

    fn indices(&self) -> Vec<usize> {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(i, &sel)| sel.then_some(i))
            .collect()
    }

    /// Returns the unselected row with the largest marginal gain and that
    /// gain. Scans rows in ascending order and only replaces the incumbent
    /// on a strictly larger gain, so ties keep the lowest index.
    ///
    /// Requires at least one unselected row.
    fn best_addition(
        &self,
        matrix: &AttributeMatrix,
        weights: &[f64],
        target: &[f64],
    ) -> (usize, f64) {
        // The empty selection scores 0 for gain accounting.
        let current = if self.size == 0 {
            0.0
        } else {
            score_unchecked(&self.means(), weights, target)
        };

        let next = (self.size + 1) as f64;
        let (without, with): (Vec<f64>, Vec<f64>) = self
            .sums
            .iter()
            .zip(weights)
            .zip(target)
            .map(|((&s, &w), &q)| {
                (
                    w * binary_kl(s as f64 / next, q),
                    w * binary_kl((s + 1) as f64 / next, q),
                )
            })
            .unzip();

        let mut best: Option<(usize, f64)> = None;
        for (row, &taken) in self.selected.iter().enumerate() {
            if taken {
                continue;
            }
            let divergence: f64 = matrix
                .row(row)
                .iter()
                .zip(without.iter().zip(&with))
                .map(|(&x, (&lo, &hi))| if x != 0 { hi } else { lo })
                .sum();
            let gain = -divergence - current;
            if best.is_none_or(|(_, g)| gain > g) {
                best = Some((row, gain));
            }
        }

        best.unwrap_or_else(|| unreachable!("greedy step requires an unselected row"))
    }
}
