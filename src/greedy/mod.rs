//! Greedy marginal-gain selection.
//!
//! One run grows a selection row by row. Each step adds the unselected row
//! whose inclusion raises the objective the most, with ties going to the
//! lowest row index. Rows are never removed once added.
//!
//! # References
//!
//! - Nemhauser, Wolsey & Fisher (1978), "An analysis of approximations for
//!   maximizing submodular set functions"

mod runner;
mod types;

pub use runner::GreedySelector;
pub use types::RunResult;
