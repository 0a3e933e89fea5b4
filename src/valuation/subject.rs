//! Subject-characteristic estimator

use crate::valuation::stats::{median, round_to};
use crate::valuation::types::{ComparableSale, SubjectInput, SubjectProperty};
use tracing::debug;

/// Median sqft, beds and baths of comps carrying a complete triple.
/// Falls back to the market baseline when no comp qualifies.
pub fn estimate_subject(comps: &[ComparableSale]) -> SubjectProperty {
    let complete: Vec<&ComparableSale> = comps
        .iter()
        .filter(|c| c.sqft > 0.0 && c.beds > 0 && c.baths > 0.0)
        .collect();

    if complete.is_empty() {
        debug!("No complete comp characteristics, using market defaults");
        return SubjectProperty::default();
    }

    let sqft: Vec<f64> = complete.iter().map(|c| c.sqft).collect();
    let beds: Vec<f64> = complete.iter().map(|c| f64::from(c.beds)).collect();
    let baths: Vec<f64> = complete.iter().map(|c| c.baths).collect();

    // `complete` is non-empty so every median exists
    let defaults = SubjectProperty::default();
    SubjectProperty {
        sqft: median(&sqft).unwrap_or(defaults.sqft),
        beds: median(&beds).map_or(defaults.beds, |b| b.round() as u32),
        baths: median(&baths).map_or(defaults.baths, |b| round_to(b, 0.5)),
    }
}

/// Fill gaps in the caller's subject description. Missing or non-positive
/// fields come from the comp medians.
pub fn resolve_subject(input: &SubjectInput, comps: &[ComparableSale]) -> SubjectProperty {
    let inferred = estimate_subject(comps);

    SubjectProperty {
        sqft: input
            .sqft
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(inferred.sqft),
        beds: input.beds.filter(|b| *b > 0).unwrap_or(inferred.beds),
        baths: input
            .baths
            .filter(|b| b.is_finite() && *b > 0.0)
            .unwrap_or(inferred.baths),
    }
}
