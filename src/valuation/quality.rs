//! Comp quality validator - sanity checks on a comp set, independent of
//! the normalizer

use crate::valuation::types::{ComparableSale, QualityReport, QualityTier};

pub const MIN_RECOMMENDED_COMPS: usize = 3;
pub const MAX_RECOMMENDED_COMPS: usize = 10;
const MAX_AVG_DISTANCE_MILES: f64 = 3.0;

/// Validate whatever list it is given. Issues accumulate; the tier is
/// derived with the fixed branching below rather than a score.
pub fn validate(comps: &[ComparableSale]) -> QualityReport {
    let mut issues = Vec::new();

    if comps.len() < MIN_RECOMMENDED_COMPS {
        issues.push(format!(
            "Too few comparables ({}), at least {} recommended",
            comps.len(),
            MIN_RECOMMENDED_COMPS
        ));
    }

    if comps.len() > MAX_RECOMMENDED_COMPS {
        issues.push(format!(
            "Excessive comparables ({}), use top {} only",
            comps.len(),
            MAX_RECOMMENDED_COMPS
        ));
    }

    let demo_count = comps.iter().filter(|c| c.is_demo()).count();
    if demo_count * 2 > comps.len() {
        issues.push(format!(
            "Too much demo data ({} of {} comparables)",
            demo_count,
            comps.len()
        ));
    }

    if !comps.is_empty() {
        let avg_distance =
            comps.iter().map(|c| c.distance_or_zero()).sum::<f64>() / comps.len() as f64;
        if avg_distance > MAX_AVG_DISTANCE_MILES {
            issues.push(format!(
                "Comparables too far away (average {:.1} miles)",
                avg_distance
            ));
        }
    }

    let mut quality = QualityTier::Excellent;
    if !issues.is_empty() {
        quality = QualityTier::Good;
    }
    if demo_count > 0 {
        quality = QualityTier::Fair;
    }
    if issues.len() > 2 {
        quality = QualityTier::Poor;
    }

    QualityReport {
        is_valid: issues.is_empty(),
        quality,
        issues,
    }
}
