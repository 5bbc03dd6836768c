//! Numeric kernels shared by the estimators
//!
//! - Arithmetic mean and sample standard deviation (ddof = 1)
//! - Percentile with linear interpolation between order statistics
//! - Tail estimate: VaR as the negated lower percentile, CVaR as the negated
//!   mean of every observation at or below -VaR

use crate::error::{RiskError, Result};
use crate::estimator::VarCvar;

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation with `n - 1` in the denominator
///
/// Requires at least two observations.
pub fn sample_std(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(RiskError::InsufficientData(format!(
            "Need at least 2 observations for a sample standard deviation, got {}",
            values.len()
        )));
    }

    let n = values.len() as f64;
    let mu = values.iter().sum::<f64>() / n;
    let sum_sq: f64 = values.iter().map(|v| (v - mu) * (v - mu)).sum();

    Ok((sum_sq / (n - 1.0)).sqrt())
}

/// Sort a copy of the sample in ascending order
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Percentile of an ascending-sorted slice at fraction `q` in [0, 1]
///
/// The rank is `q * (n - 1)`; the result interpolates linearly between the
/// two bracketing order statistics and never leaves their range.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(RiskError::InsufficientData(
            "Cannot take a percentile of an empty sample".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(RiskError::InvalidParameter(format!(
            "Percentile fraction {} outside [0, 1]",
            q
        )));
    }

    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let t = rank - lo as f64;

    let a = sorted[lo];
    let b = sorted[hi];
    let diff = b - a;

    // Interpolate from the nearer end to keep rounding error small
    let value = if t >= 0.5 { b - diff * (1.0 - t) } else { a + diff * t };

    // `f64::clamp` panics on NaN bounds
    let value = if value < a {
        a
    } else if value > b {
        b
    } else {
        value
    };

    Ok(value)
}

/// VaR and CVaR of a return sample at the given confidence level
///
/// An empty tail is reported as [`RiskError::EmptyTail`] rather than a NaN
/// average. With finite input the observation at the lower bracket of the
/// percentile is always in the tail, so this only fires on empty or NaN data.
pub fn tail_estimate(sample: &[f64], confidence_level: f64) -> Result<VarCvar> {
    let alpha = 1.0 - confidence_level;
    let ordered = sorted(sample);

    let var = -percentile_sorted(&ordered, alpha)?;
    let threshold = -var;

    let tail: Vec<f64> = ordered
        .iter()
        .copied()
        .filter(|r| *r <= threshold)
        .collect();

    let cvar = match mean(&tail) {
        Some(tail_mean) if tail_mean.is_finite() => -tail_mean,
        _ => return Err(RiskError::EmptyTail { confidence_level }),
    };

    Ok(VarCvar { var, cvar })
}
