//! Representative subset selection over binary attributes.
//!
//! Given `n` candidates described by `f` binary attributes, picks `k` of
//! them so that the attribute means of the chosen subset match a target
//! distribution as closely as possible:
//!
//! - **Objective**: negative weighted binary KL divergence between the
//!   achieved and target attribute means ([`objective`]).
//! - **Greedy selection**: grows one subset by repeatedly adding the row
//!   with the largest marginal gain ([`GreedySelector`]).
//! - **Multi-start**: repeats the greedy run from independent random seed
//!   rows and keeps the best ([`MultiStartRunner`]).
//!
//! # Example
//!
//! ```
//! use u_entrofy::{entrofy, AttributeMatrix, SelectionConfig};
//!
//! let x = AttributeMatrix::from_fn(200, 2, |i, j| (i >> j) & 1 == 1);
//! let config = SelectionConfig::default()
//!     .with_target(vec![0.25, 0.5])
//!     .with_seed(42);
//!
//! let (score, indices) = entrofy(&x, 8, &config).unwrap();
//! assert_eq!(indices.len(), 8);
//! assert!(score <= 0.0);
//! ```
//!
//! # Architecture
//!
//! Data flows one way: the multi-start runner calls the greedy selector,
//! which calls the objective. Ingestion of tabular data and presentation
//! of results belong to callers; the crate only consumes an
//! [`AttributeMatrix`] and returns scores and row indices.

pub mod config;
pub mod error;
pub mod greedy;
pub mod matrix;
pub mod multistart;
pub mod objective;
pub mod random;

pub use config::SelectionConfig;
pub use error::{EntrofyError, Result};
pub use greedy::{GreedySelector, RunResult};
pub use matrix::AttributeMatrix;
pub use multistart::{MultiStartResult, MultiStartRunner};

/// Selects `k` rows of `matrix` whose attribute means best match the
/// configured target.
///
/// Returns `(score, indices)` with `indices` ascending. The score is `0` at
/// an exact match and negative otherwise. When `k == n` every row is
/// returned and the score of the full population is still computed.
///
/// # Errors
/// Validation errors for an out-of-range `k`, invalid weights or targets,
/// mismatched lengths, bad pre-selects, or `n_samples == 0`, all raised
/// before any selection work.
pub fn entrofy(
    matrix: &AttributeMatrix,
    k: usize,
    config: &SelectionConfig,
) -> Result<(f64, Vec<usize>)> {
    MultiStartRunner::run(matrix, k, config).map(|r| r.best.into_pair())
}
