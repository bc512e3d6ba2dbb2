//! Selection configuration.
//!
//! [`SelectionConfig`] holds everything besides the matrix and `k` that
//! controls a selection: attribute weights, the target distribution,
//! forced pre-selections, and the multi-start parameters.

use crate::error::{EntrofyError, Result};

/// Default number of multi-start trials.
pub const DEFAULT_N_SAMPLES: usize = 15;

/// Default target probability for every attribute.
pub const DEFAULT_TARGET: f64 = 0.5;

/// Configuration for greedy and multi-start selection.
///
/// # Defaults
///
/// ```
/// use u_entrofy::SelectionConfig;
///
/// let config = SelectionConfig::default();
/// assert_eq!(config.n_samples, 15);
/// assert!(config.weights.is_none());
/// assert!(config.target.is_none());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_entrofy::SelectionConfig;
///
/// let config = SelectionConfig::default()
///     .with_weights(vec![1.0, 2.0, 1.0])
///     .with_target(vec![0.5, 0.8, 0.2])
///     .with_n_samples(50)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionConfig {
    /// Per-attribute weights. `None` weights every attribute by `1.0`.
    pub weights: Option<Vec<f64>>,

    /// Target probability per attribute. `None` targets `0.5` everywhere.
    pub target: Option<Vec<f64>>,

    /// Rows that must be part of the selection.
    ///
    /// When set, the greedy run starts from exactly these rows instead of
    /// a random seed row, and multi-start runs a single trial.
    pub pre_selects: Option<Vec<usize>>,

    /// Number of randomized greedy trials.
    pub n_samples: usize,

    /// Random seed for reproducibility. `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Whether to run trials on the rayon pool.
    ///
    /// Only has an effect with the `parallel` feature enabled. Results are
    /// identical either way for a given seed.
    pub parallel: bool,

    /// Optional wall-clock limit in milliseconds.
    ///
    /// Checked between trials; the first trial always runs.
    pub time_limit_ms: Option<u64>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            weights: None,
            target: None,
            pre_selects: None,
            n_samples: DEFAULT_N_SAMPLES,
            seed: None,
            parallel: true,
            time_limit_ms: None,
        }
    }
}

impl SelectionConfig {
    /// Sets the attribute weights.
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Sets the target distribution.
    pub fn with_target(mut self, target: Vec<f64>) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the forced pre-selected rows.
    pub fn with_pre_selects(mut self, rows: Vec<usize>) -> Self {
        self.pre_selects = Some(rows);
        self
    }

    /// Sets the number of multi-start trials.
    pub fn with_n_samples(mut self, n: usize) -> Self {
        self.n_samples = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel trials.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the wall-clock limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Validates the configuration against a matrix shape and subset size.
    ///
    /// Runs [`validate_selection`](Self::validate_selection), then checks
    /// `n_samples`.
    pub fn validate(&self, n_rows: usize, n_attributes: usize, k: usize) -> Result<()> {
        self.validate_selection(n_rows, n_attributes, k)?;
        if self.n_samples == 0 {
            return Err(EntrofyError::InvalidSampleCount);
        }
        Ok(())
    }

    /// Validates everything a single greedy run depends on.
    ///
    /// Checks run in a fixed order: weight/target lengths, `k`, weight
    /// values, target values, then pre-selects.
    pub fn validate_selection(&self, n_rows: usize, n_attributes: usize, k: usize) -> Result<()> {
        if let Some(w) = &self.weights {
            if w.len() != n_attributes {
                return Err(EntrofyError::ShapeMismatch {
                    what: "weights",
                    expected: n_attributes,
                    actual: w.len(),
                });
            }
        }
        if let Some(q) = &self.target {
            if q.len() != n_attributes {
                return Err(EntrofyError::ShapeMismatch {
                    what: "target",
                    expected: n_attributes,
                    actual: q.len(),
                });
            }
        }
        if k == 0 || k > n_rows {
            return Err(EntrofyError::SelectionSizeOutOfRange { k, n: n_rows });
        }
        if let Some(w) = &self.weights {
            if let Some((index, &value)) = w
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(EntrofyError::InvalidWeight { index, value });
            }
        }
        if let Some(q) = &self.target {
            if let Some((index, &value)) = q
                .iter()
                .enumerate()
                .find(|(_, v)| !(0.0..=1.0).contains(*v))
            {
                return Err(EntrofyError::TargetOutOfRange { index, value });
            }
        }
        if let Some(rows) = &self.pre_selects {
            if let Some(&row) = rows.iter().find(|&&r| r >= n_rows) {
                return Err(EntrofyError::PreSelectOutOfRange { row, n: n_rows });
            }
            let count = distinct_sorted(rows).len();
            if count > k {
                return Err(EntrofyError::TooManyPreSelects { count, k });
            }
        }
        Ok(())
    }

    /// Weights with the all-ones default filled in.
    pub fn resolved_weights(&self, n_attributes: usize) -> Vec<f64> {
        self.weights
            .clone()
            .unwrap_or_else(|| vec![1.0; n_attributes])
    }

    /// Target with the all-0.5 default filled in.
    pub fn resolved_target(&self, n_attributes: usize) -> Vec<f64> {
        self.target
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_TARGET; n_attributes])
    }

    /// Number of trials actually run: `1` when pre-selects are forced.
    pub fn effective_samples(&self) -> usize {
        if self.pre_selects.is_some() {
            1
        } else {
            self.n_samples
        }
    }
}

/// Sorted, de-duplicated copy of a row list.
pub(crate) fn distinct_sorted(rows: &[usize]) -> Vec<usize> {
    let mut rows = rows.to_vec();
    rows.sort_unstable();
    rows.dedup();
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SelectionConfig::default();
        assert_eq!(config.n_samples, 15);
        assert!(config.seed.is_none());
        assert!(config.parallel);
        assert_eq!(config.resolved_weights(3), vec![1.0; 3]);
        assert_eq!(config.resolved_target(2), vec![0.5; 2]);
    }

    #[test]
    fn test_validate_ok() {
        assert!(SelectionConfig::default().validate(10, 3, 5).is_ok());
        assert!(SelectionConfig::default().validate(10, 3, 10).is_ok());
    }

    #[test]
    fn test_validate_k_zero() {
        let err = SelectionConfig::default().validate(10, 3, 0).unwrap_err();
        assert_eq!(err, EntrofyError::SelectionSizeOutOfRange { k: 0, n: 10 });
    }

    #[test]
    fn test_validate_k_too_large() {
        let err = SelectionConfig::default().validate(10, 3, 11).unwrap_err();
        assert_eq!(err, EntrofyError::SelectionSizeOutOfRange { k: 11, n: 10 });
    }

    #[test]
    fn test_validate_negative_weight() {
        let config = SelectionConfig::default().with_weights(vec![1.0, -0.5, 1.0]);
        let err = config.validate(10, 3, 5).unwrap_err();
        assert_eq!(
            err,
            EntrofyError::InvalidWeight {
                index: 1,
                value: -0.5
            }
        );
    }

    #[test]
    fn test_validate_nan_weight() {
        let config = SelectionConfig::default().with_weights(vec![f64::NAN, 1.0, 1.0]);
        assert!(matches!(
            config.validate(10, 3, 5),
            Err(EntrofyError::InvalidWeight { index: 0, .. })
        ));
    }

    #[test]
    fn test_validate_target_out_of_range() {
        let config = SelectionConfig::default().with_target(vec![0.5, 1.5, 0.5]);
        let err = config.validate(10, 3, 5).unwrap_err();
        assert_eq!(
            err,
            EntrofyError::TargetOutOfRange {
                index: 1,
                value: 1.5
            }
        );
    }

    #[test]
    fn test_validate_shape_mismatch() {
        let config = SelectionConfig::default().with_weights(vec![1.0, 1.0]);
        assert!(matches!(
            config.validate(10, 3, 5),
            Err(EntrofyError::ShapeMismatch { what: "weights", expected: 3, actual: 2 })
        ));

        let config = SelectionConfig::default().with_target(vec![0.5; 4]);
        assert!(matches!(
            config.validate(10, 3, 5),
            Err(EntrofyError::ShapeMismatch { what: "target", expected: 3, actual: 4 })
        ));
    }

    #[test]
    fn test_validate_pre_selects() {
        let config = SelectionConfig::default().with_pre_selects(vec![1, 10]);
        assert_eq!(
            config.validate(10, 3, 5).unwrap_err(),
            EntrofyError::PreSelectOutOfRange { row: 10, n: 10 }
        );

        let config = SelectionConfig::default().with_pre_selects(vec![0, 1, 2]);
        assert_eq!(
            config.validate(10, 3, 2).unwrap_err(),
            EntrofyError::TooManyPreSelects { count: 3, k: 2 }
        );

        // Duplicates collapse before the count check.
        let config = SelectionConfig::default().with_pre_selects(vec![4, 4, 4]);
        assert!(config.validate(10, 3, 1).is_ok());
    }

    #[test]
    fn test_validate_zero_samples() {
        let config = SelectionConfig::default().with_n_samples(0);
        assert_eq!(
            config.validate(10, 3, 5).unwrap_err(),
            EntrofyError::InvalidSampleCount
        );
    }

    #[test]
    fn test_validate_selection_ignores_samples() {
        let config = SelectionConfig::default().with_n_samples(0);
        assert!(config.validate_selection(10, 3, 5).is_ok());
    }

    #[test]
    fn test_effective_samples() {
        let config = SelectionConfig::default().with_n_samples(40);
        assert_eq!(config.effective_samples(), 40);
        assert_eq!(config.with_pre_selects(vec![0]).effective_samples(), 1);
    }
}
