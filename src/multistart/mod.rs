//! Randomized multi-start search.
//!
//! Runs several independent greedy selections, each from its own random
//! seed row, and keeps the highest-scoring one. Trials share only the
//! read-only inputs, so they can run in parallel; the winner is picked by
//! an ordered reduction so the outcome never depends on completion order.

mod runner;

pub use runner::{MultiStartResult, MultiStartRunner};
