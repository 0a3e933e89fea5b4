//! Characteristic adjuster - moves each comp's price toward the subject's
//! size, bedroom and bathroom count

use crate::valuation::stats::mean;
use crate::valuation::types::{AdjustedComp, ComparableSale, SubjectProperty};
use tracing::debug;

/// Share of the batch price-per-sqft applied to square footage differences
const SQFT_FACTOR: f64 = 0.8;
const MIN_BED_VALUE: f64 = 5_000.0;
const BED_FACTOR: f64 = 0.02;
const MIN_BATH_VALUE: f64 = 3_000.0;
const BATH_FACTOR: f64 = 0.015;

/// Dollar-per-unit rates derived from the comp batch itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustmentRates {
    pub avg_price_per_sqft: f64,
    pub per_sqft: f64,
    pub per_bed: f64,
    pub per_bath: f64,
}

impl AdjustmentRates {
    /// Derive rates from `mean(salePrice / sqft)` across the batch
    pub fn from_comps(comps: &[ComparableSale]) -> Self {
        let ratios: Vec<f64> = comps.iter().map(|c| c.sale_price / c.sqft).collect();
        let avg_price_per_sqft = mean(&ratios).unwrap_or(0.0);

        AdjustmentRates {
            avg_price_per_sqft,
            per_sqft: avg_price_per_sqft * SQFT_FACTOR,
            per_bed: (avg_price_per_sqft * 100.0 * BED_FACTOR).max(MIN_BED_VALUE),
            per_bath: (avg_price_per_sqft * 100.0 * BATH_FACTOR).max(MIN_BATH_VALUE),
        }
    }
}

/// Adjust a single comp with precomputed rates
pub fn adjust_one(
    comp: &ComparableSale,
    subject: &SubjectProperty,
    rates: &AdjustmentRates,
) -> AdjustedComp {
    let original_price = comp.sale_price;

    let sqft_adj = if subject.sqft != comp.sqft {
        (subject.sqft - comp.sqft) * rates.per_sqft
    } else {
        0.0
    };

    let bed_adj = if subject.beds != comp.beds {
        (f64::from(subject.beds) - f64::from(comp.beds)) * rates.per_bed
    } else {
        0.0
    };

    let bath_adj = if subject.baths != comp.baths {
        (subject.baths - comp.baths) * rates.per_bath
    } else {
        0.0
    };

    let adjustments = sqft_adj + bed_adj + bath_adj;
    let adjustment_percent = if original_price != 0.0 {
        adjustments / original_price * 100.0
    } else {
        0.0
    };

    AdjustedComp {
        original_price,
        adjusted_price: original_price + adjustments,
        adjustments,
        adjustment_percent,
    }
}

/// Adjust every comp toward the subject, same order as the input
pub fn adjust(comps: &[ComparableSale], subject: &SubjectProperty) -> Vec<AdjustedComp> {
    let rates = AdjustmentRates::from_comps(comps);
    debug!(
        "Adjustment rates: ${:.2}/sqft avg, ${:.2}/sqft applied, ${:.0}/bed, ${:.0}/bath",
        rates.avg_price_per_sqft, rates.per_sqft, rates.per_bed, rates.per_bath
    );

    comps
        .iter()
        .map(|comp| adjust_one(comp, subject, &rates))
        .collect()
}
