//! Multi-start execution.

use crate::config::SelectionConfig;
use crate::error::{EntrofyError, Result};
use crate::greedy::{GreedySelector, RunResult};
use crate::matrix::AttributeMatrix;
use crate::random::{create_rng, master_rng, trial_seeds};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of a multi-start search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiStartResult {
    /// The highest-scoring run.
    pub best: RunResult,

    /// Trial index that produced `best`.
    pub best_trial: usize,

    /// Score of every scheduled trial, in trial order.
    ///
    /// `None` marks a trial skipped by cancellation or the time limit.
    pub trial_scores: Vec<Option<f64>>,

    /// Number of trials that ran to completion.
    pub trials: usize,

    /// Whether some trials were skipped by cancellation or the time limit.
    pub cancelled: bool,
}

/// Executes the randomized multi-start search.
///
/// # Usage
///
/// ```
/// use u_entrofy::{AttributeMatrix, MultiStartRunner, SelectionConfig};
///
/// let x = AttributeMatrix::from_fn(50, 3, |i, j| (i * 7 + j * 3) % 5 < 2);
/// let config = SelectionConfig::default().with_n_samples(8).with_seed(42);
/// let result = MultiStartRunner::run(&x, 10, &config).unwrap();
///
/// assert_eq!(result.best.indices.len(), 10);
/// assert_eq!(result.trials, 8);
/// ```
pub struct MultiStartRunner;

impl MultiStartRunner {
    /// Runs the search.
    ///
    /// # Errors
    /// Any validation error from [`SelectionConfig::validate`], raised
    /// before the first trial.
    pub fn run(
        matrix: &AttributeMatrix,
        k: usize,
        config: &SelectionConfig,
    ) -> Result<MultiStartResult> {
        Self::run_with_cancel(matrix, k, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// The flag is checked before each trial. Trials already running are
    /// finished. If no trial completes the call fails with
    /// [`EntrofyError::Cancelled`]; otherwise the best completed trial is
    /// returned with `cancelled` set.
    pub fn run_with_cancel(
        matrix: &AttributeMatrix,
        k: usize,
        config: &SelectionConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<MultiStartResult> {
        config.validate(matrix.n_rows(), matrix.n_attributes(), k)?;

        let weights = config.resolved_weights(matrix.n_attributes());
        let target = config.resolved_target(matrix.n_attributes());
        let pre_selects = config.pre_selects.as_deref();

        let samples = config.effective_samples();
        let seeds = trial_seeds(&mut master_rng(config.seed), samples);

        let start = Instant::now();
        let deadline = config
            .time_limit_ms
            .map(|ms| start + Duration::from_millis(ms));

        info!(
            event = "multistart_start",
            rows = matrix.n_rows(),
            attributes = matrix.n_attributes(),
            k,
            trials = samples,
            parallel = config.parallel,
        );

        let run_trial = |trial: usize, seed: u64| -> Option<RunResult> {
            if let Some(flag) = &cancel {
                if flag.load(Ordering::Relaxed) {
                    return None;
                }
            }
            // The first trial always runs so a time limit never yields nothing.
            if trial > 0 && deadline.is_some_and(|d| Instant::now() >= d) {
                return None;
            }
            let mut rng = create_rng(seed);
            Some(GreedySelector::run_validated(
                matrix,
                k,
                &weights,
                &target,
                pre_selects,
                &mut rng,
            ))
        };

        let outcomes = dispatch(&seeds, config.parallel, run_trial);
        let result = reduce(outcomes);
        let duration_ms = start.elapsed().as_millis() as u64;

        match &result {
            Some(r) if r.cancelled => warn!(
                event = "multistart_stopped_early",
                completed = r.trials,
                scheduled = samples,
                best_score = r.best.score,
                duration_ms,
            ),
            Some(r) => info!(
                event = "multistart_end",
                trials = r.trials,
                best_trial = r.best_trial,
                best_score = r.best.score,
                duration_ms,
            ),
            None => warn!(event = "multistart_cancelled", scheduled = samples, duration_ms),
        }

        result.ok_or(EntrofyError::Cancelled)
    }
}

/// Runs every trial and returns the outcomes in trial order.
#[cfg(feature = "parallel")]
fn dispatch<F>(seeds: &[u64], parallel: bool, run_trial: F) -> Vec<Option<RunResult>>
where
    F: Fn(usize, u64) -> Option<RunResult> + Send + Sync,
{
    if parallel {
        seeds
            .par_iter()
            .enumerate()
            .map(|(trial, &seed)| run_trial(trial, seed))
            .collect()
    } else {
        seeds
            .iter()
            .enumerate()
            .map(|(trial, &seed)| run_trial(trial, seed))
            .collect()
    }
}

/// Runs every trial and returns the outcomes in trial order.
#[cfg(not(feature = "parallel"))]
fn dispatch<F>(seeds: &[u64], _parallel: bool, run_trial: F) -> Vec<Option<RunResult>>
where
    F: Fn(usize, u64) -> Option<RunResult>,
{
    seeds
        .iter()
        .enumerate()
        .map(|(trial, &seed)| run_trial(trial, seed))
        .collect()
}

/// Picks the strictly best completed trial, earliest trial on ties.
///
/// Returns `None` if no trial completed.
fn reduce(outcomes: Vec<Option<RunResult>>) -> Option<MultiStartResult> {
    let mut trial_scores = Vec::with_capacity(outcomes.len());
    let mut best: Option<(usize, RunResult)> = None;
    let mut trials = 0usize;

    for (trial, outcome) in outcomes.into_iter().enumerate() {
        let Some(result) = outcome else {
            trial_scores.push(None);
            continue;
        };
        trials += 1;
        trial_scores.push(Some(result.score));
        if best.as_ref().is_none_or(|(_, b)| result.score > b.score) {
            best = Some((trial, result));
        }
    }

    let (best_trial, best) = best?;
    Some(MultiStartResult {
        best,
        best_trial,
        cancelled: trials < trial_scores.len(),
        trial_scores,
        trials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped(n: usize, f: usize) -> AttributeMatrix {
        AttributeMatrix::from_fn(n, f, |i, j| (i * 31 + j * 17) % 7 < 3)
    }

    fn run_result(score: f64) -> RunResult {
        RunResult {
            score,
            indices: vec![0],
            achieved: vec![],
        }
    }

    #[test]
    fn test_reduce_keeps_first_on_tie() {
        let outcomes = vec![
            Some(run_result(-0.5)),
            Some(run_result(-0.1)),
            Some(run_result(-0.1)),
            Some(run_result(-0.3)),
        ];
        let result = reduce(outcomes).unwrap();
        assert_eq!(result.best_trial, 1);
        assert_eq!(result.trials, 4);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_reduce_skipped_trials() {
        let outcomes = vec![Some(run_result(-0.2)), None, Some(run_result(-0.4))];
        let result = reduce(outcomes).unwrap();
        assert_eq!(result.best_trial, 0);
        assert_eq!(result.trials, 2);
        assert!(result.cancelled);
        assert_eq!(result.trial_scores, vec![Some(-0.2), None, Some(-0.4)]);
    }

    #[test]
    fn test_reduce_nothing_completed() {
        assert!(reduce(vec![None, None]).is_none());
    }

    #[test]
    fn test_best_dominates_every_trial() {
        let x = striped(120, 4);
        let config = SelectionConfig::default()
            .with_target(vec![0.2, 0.4, 0.6, 0.8])
            .with_n_samples(12)
            .with_seed(7);
        let result = MultiStartRunner::run(&x, 15, &config).unwrap();

        assert_eq!(result.trial_scores.len(), 12);
        for score in result.trial_scores.iter().flatten() {
            assert!(result.best.score >= *score);
        }
        assert_eq!(result.trial_scores[result.best_trial], Some(result.best.score));
    }

    #[test]
    fn test_seed_reproducible() {
        let x = striped(80, 3);
        let config = SelectionConfig::default().with_n_samples(6).with_seed(42);
        let a = MultiStartRunner::run(&x, 9, &config).unwrap();
        let b = MultiStartRunner::run(&x, 9, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let x = striped(90, 5);
        let config = SelectionConfig::default().with_n_samples(10).with_seed(3);
        let par = MultiStartRunner::run(&x, 12, &config.clone().with_parallel(true)).unwrap();
        let seq = MultiStartRunner::run(&x, 12, &config.with_parallel(false)).unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn test_pre_selects_force_single_trial() {
        let x = striped(60, 3);
        let config = SelectionConfig::default()
            .with_n_samples(25)
            .with_pre_selects(vec![4, 9]);
        let result = MultiStartRunner::run(&x, 8, &config).unwrap();

        assert_eq!(result.trials, 1);
        assert_eq!(result.trial_scores.len(), 1);
        assert!(result.best.indices.contains(&4));
        assert!(result.best.indices.contains(&9));
    }

    #[test]
    fn test_cancellation_before_start() {
        let x = striped(40, 3);
        let config = SelectionConfig::default().with_seed(1);
        let cancel = Arc::new(AtomicBool::new(true));

        let err = MultiStartRunner::run_with_cancel(&x, 5, &config, Some(cancel)).unwrap_err();
        assert_eq!(err, EntrofyError::Cancelled);
    }

    #[test]
    fn test_zero_time_limit_runs_first_trial() {
        let x = striped(40, 3);
        let config = SelectionConfig::default()
            .with_n_samples(5)
            .with_time_limit_ms(0)
            .with_parallel(false)
            .with_seed(1);
        let result = MultiStartRunner::run(&x, 5, &config).unwrap();

        assert_eq!(result.trials, 1);
        assert_eq!(result.best_trial, 0);
        assert!(result.cancelled);
    }

    #[test]
    fn test_validation_before_trials() {
        let x = striped(40, 3);
        let config = SelectionConfig::default().with_n_samples(0);
        assert_eq!(
            MultiStartRunner::run(&x, 5, &config).unwrap_err(),
            EntrofyError::InvalidSampleCount
        );

        let config = SelectionConfig::default();
        assert!(matches!(
            MultiStartRunner::run(&x, 41, &config),
            Err(EntrofyError::SelectionSizeOutOfRange { k: 41, n: 40 })
        ));
    }

    #[test]
    fn test_full_population() {
        let x = striped(30, 2);
        let config = SelectionConfig::default().with_seed(0);
        let result = MultiStartRunner::run(&x, 30, &config).unwrap();
        assert_eq!(result.best.indices, (0..30).collect::<Vec<_>>());
        assert!(result.best.score.is_finite());
    }
}
