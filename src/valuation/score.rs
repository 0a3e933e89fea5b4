//! Dispersion and confidence scorer

use crate::valuation::stats::{mean, std_dev_around};
use crate::valuation::types::{
    AdjustedComp, ComparableSale, Dispersion, QualityMetrics, QualityReport,
};
use crate::valuation::weight::days_ago;
use chrono::{DateTime, Utc};

const INTERVAL_STD_DEVS: f64 = 1.5;
const BASE_CONFIDENCE: i32 = 50;
const PER_COMP_CONFIDENCE: i32 = 5;
const MAX_CONFIDENCE: i32 = 95;

/// Sources from the same vendor family share a prefix, e.g. "attom_cached"
const TRUSTED_SOURCE_PREFIX: &str = "attom";

pub fn recency_bonus(avg_days_old: f64) -> i32 {
    if avg_days_old < 90.0 {
        10
    } else if avg_days_old < 180.0 {
        5
    } else {
        0
    }
}

pub fn distance_penalty(avg_distance: f64) -> i32 {
    if avg_distance > 2.0 {
        -10
    } else if avg_distance > 1.0 {
        -5
    } else {
        0
    }
}

pub fn source_bonus(comps: &[ComparableSale]) -> i32 {
    let all_trusted = !comps.is_empty()
        && comps
            .iter()
            .all(|c| c.source.to_lowercase().starts_with(TRUSTED_SOURCE_PREFIX));
    if all_trusted {
        5
    } else {
        0
    }
}

/// Distinct sources, first-seen order
fn distinct_sources(comps: &[ComparableSale]) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for comp in comps {
        if !sources.contains(&comp.source) {
            sources.push(comp.source.clone());
        }
    }
    sources
}

/// Interval and confidence for one valuation.
///
/// The standard deviation is the population deviation of adjusted prices
/// around the final estimate. Confidence is
/// `50 + 5*count + quality + recency + source + distance`, clamped to
/// `[0, 95]`.
pub fn score(
    adjusted: &[AdjustedComp],
    estimated_value: i64,
    valid_comps: &[ComparableSale],
    quality: &QualityReport,
    now: DateTime<Utc>,
) -> Dispersion {
    let prices: Vec<f64> = adjusted.iter().map(|c| c.adjusted_price).collect();
    let estimate = estimated_value as f64;
    let std_dev = std_dev_around(&prices, estimate).unwrap_or(0.0);

    let min_value = (estimate - INTERVAL_STD_DEVS * std_dev).round() as i64;
    let max_value = (estimate + INTERVAL_STD_DEVS * std_dev).round() as i64;

    let distances: Vec<f64> = valid_comps.iter().map(|c| c.distance_or_zero()).collect();
    let ages: Vec<f64> = valid_comps
        .iter()
        .map(|c| days_ago(c, now) as f64)
        .collect();
    let avg_distance = mean(&distances).unwrap_or(0.0);
    let avg_days_old = mean(&ages).unwrap_or(0.0);

    let count = i32::try_from(valid_comps.len()).unwrap_or(i32::MAX);
    let count_bonus = PER_COMP_CONFIDENCE.saturating_mul(count);
    let raw = BASE_CONFIDENCE
        .saturating_add(count_bonus)
        .saturating_add(quality.quality.confidence_bonus())
        .saturating_add(recency_bonus(avg_days_old))
        .saturating_add(source_bonus(valid_comps))
        .saturating_add(distance_penalty(avg_distance));
    let confidence = raw.clamp(0, MAX_CONFIDENCE) as u8;

    Dispersion {
        std_dev,
        min_value,
        max_value,
        confidence,
        metrics: QualityMetrics {
            avg_distance: (avg_distance * 10.0).round() / 10.0,
            avg_days_old: avg_days_old.round() as i64,
            sources: distinct_sources(valid_comps),
            tier: quality.quality,
            issues: quality.issues.clone(),
            comps_without_distance: valid_comps.iter().filter(|c| c.distance.is_none()).count(),
        },
    }
}
