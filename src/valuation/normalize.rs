//! Comparable normalizer - drops records the estimator cannot use

use crate::valuation::types::ComparableSale;
use tracing::{debug, warn};

/// A comp is usable when every number the pipeline touches is finite and
/// price, sqft and beds are positive. That includes the derived price per
/// sqft. Baths may be zero; a distance, when present, must be a non-negative
/// finite number.
pub fn is_valid(comp: &ComparableSale) -> bool {
    let distance_ok = match comp.distance {
        Some(d) => d.is_finite() && d >= 0.0,
        None => true,
    };

    comp.sale_price.is_finite()
        && comp.sale_price > 0.0
        && comp.sqft.is_finite()
        && comp.sqft > 0.0
        && (comp.sale_price / comp.sqft).is_finite()
        && comp.beds > 0
        && comp.baths.is_finite()
        && comp.baths >= 0.0
        && distance_ok
}

/// Keep only valid comps, preserving order. Survivors are cloned unchanged.
pub fn normalize(comps: &[ComparableSale]) -> Vec<ComparableSale> {
    let valid: Vec<ComparableSale> = comps.iter().filter(|c| is_valid(c)).cloned().collect();

    let dropped = comps.len() - valid.len();
    if dropped > 0 {
        warn!(
            "Dropped {} of {} comparables with missing or invalid price/sqft/beds",
            dropped,
            comps.len()
        );
    } else {
        debug!("All {} comparables passed normalization", comps.len());
    }

    valid
}
