//! Multi-method reconciler

use crate::valuation::stats::{mean, median};
use crate::valuation::types::{AdjustedComp, Reconciliation};

const WEIGHTED_SHARE: f64 = 0.6;
const MEDIAN_SHARE: f64 = 0.25;
const AVERAGE_SHARE: f64 = 0.15;

/// Blend weighted mean, median and simple mean of adjusted prices.
/// `weights` must be normalized and in the same order as `adjusted`.
pub fn reconcile(adjusted: &[AdjustedComp], weights: &[f64]) -> Reconciliation {
    let prices: Vec<f64> = adjusted.iter().map(|c| c.adjusted_price).collect();

    let weighted: f64 = prices.iter().zip(weights).map(|(p, w)| p * w).sum();
    let median = median(&prices).unwrap_or(0.0);
    let average = mean(&prices).unwrap_or(0.0);

    let blended = weighted * WEIGHTED_SHARE + median * MEDIAN_SHARE + average * AVERAGE_SHARE;

    Reconciliation {
        weighted,
        median,
        average,
        estimated_value: blended.round() as i64,
    }
}
