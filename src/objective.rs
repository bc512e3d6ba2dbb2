//! Weighted binary KL-divergence objective.
//!
//! The score of a selection is
//!
//! ```text
//! score(p) = -sum_j w_j * D(p_j || q_j)
//! D(a || b) = a * ln(a / b) + (1 - a) * ln((1 - a) / (1 - b))
//! ```
//!
//! where `p` is the achieved attribute mean of the selection, `q` the target
//! and `w` the per-attribute weights. Higher is better and `0` is optimal.
//!
//! Every logarithm argument is shifted by [`LOG_FLOOR`], numerator and
//! denominator alike, so that `p_j = 0` or `q_j in {0, 1}` never produces
//! `ln(0)`.

use crate::error::{EntrofyError, Result};

/// Additive floor applied to every logarithm argument.
pub const LOG_FLOOR: f64 = 1e-200;

/// Binary KL divergence `D(a || b)` with the [`LOG_FLOOR`] shift applied.
///
/// # Examples
///
/// ```
/// use u_entrofy::objective::binary_kl;
///
/// assert_eq!(binary_kl(0.3, 0.3), 0.0);
/// assert!(binary_kl(0.9, 0.1) > 0.0);
/// ```
#[inline]
pub fn binary_kl(a: f64, b: f64) -> f64 {
    a * ((a + LOG_FLOOR) / (b + LOG_FLOOR)).ln()
        + (1.0 - a) * ((1.0 - a + LOG_FLOOR) / (1.0 - b + LOG_FLOOR)).ln()
}

/// Scores an achieved distribution `p` against target `q` under weights `w`.
///
/// # Errors
/// [`EntrofyError::ShapeMismatch`] if the three slices differ in length.
///
/// # Examples
///
/// ```
/// use u_entrofy::objective::objective;
///
/// let w = [1.0, 2.0];
/// let q = [0.5, 0.2];
/// assert_eq!(objective(&q, &w, &q).unwrap(), 0.0);
/// assert!(objective(&[0.9, 0.2], &w, &q).unwrap() < 0.0);
/// ```
pub fn objective(p: &[f64], w: &[f64], q: &[f64]) -> Result<f64> {
    check_shapes(p, w, q)?;
    Ok(score_unchecked(p, w, q))
}

/// Per-attribute weighted divergence `w_j * D(p_j || q_j)`.
///
/// The entries sum to `-objective(p, w, q)`. Useful for reporting which
/// attributes a selection misses.
///
/// # Errors
/// [`EntrofyError::ShapeMismatch`] if the three slices differ in length.
pub fn divergence_breakdown(p: &[f64], w: &[f64], q: &[f64]) -> Result<Vec<f64>> {
    check_shapes(p, w, q)?;
    Ok(p.iter()
        .zip(w)
        .zip(q)
        .map(|((&pj, &wj), &qj)| wj * binary_kl(pj, qj))
        .collect())
}

/// Score without the length check. Callers guarantee equal lengths.
pub(crate) fn score_unchecked(p: &[f64], w: &[f64], q: &[f64]) -> f64 {
    -p.iter()
        .zip(w)
        .zip(q)
        .map(|((&pj, &wj), &qj)| wj * binary_kl(pj, qj))
        .sum::<f64>()
}

fn check_shapes(p: &[f64], w: &[f64], q: &[f64]) -> Result<()> {
    if w.len() != p.len() {
        return Err(EntrofyError::ShapeMismatch {
            what: "weights",
            expected: p.len(),
            actual: w.len(),
        });
    }
    if q.len() != p.len() {
        return Err(EntrofyError::ShapeMismatch {
            what: "target",
            expected: p.len(),
            actual: q.len(),
        });
    }
    Ok(())
}
