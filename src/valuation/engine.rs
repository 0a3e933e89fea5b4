//! Valuation entry point - composes the pipeline stages

use crate::valuation::adjust::adjust;
use crate::valuation::error::ValuationError;
use crate::valuation::normalize::normalize;
use crate::valuation::quality::validate;
use crate::valuation::reconcile::reconcile;
use crate::valuation::score::score;
use crate::valuation::subject::resolve_subject;
use crate::valuation::types::{
    ComparableSale, MethodEstimates, SubjectInput, ValuationBreakdown, ValuationResult,
};
use crate::valuation::weight::weight;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Estimate a value for the subject from its comparable sales.
///
/// `now` is the reference point for sale recency, so the same inputs and
/// the same `now` always produce the same result. Fails only when no comp
/// survives normalization; weak comp sets come back with a lowered
/// confidence and populated issues instead.
pub fn calculate_value(
    comps: &[ComparableSale],
    subject: &SubjectInput,
    now: DateTime<Utc>,
) -> Result<ValuationResult, ValuationError> {
    // Step 1: Normalize
    let mut valid = normalize(comps);
    if valid.is_empty() {
        return Err(ValuationError::NoValidComparables {
            received: comps.len(),
        });
    }

    // Step 2: Resolve subject characteristics
    let subject = resolve_subject(subject, &valid);
    debug!(
        "Subject: {} sqft, {} beds, {} baths",
        subject.sqft, subject.beds, subject.baths
    );

    // Step 3: Adjust, dropping comps whose adjusted price overflows.
    // Rates come from the batch, so they are re-derived after each drop.
    let adjusted = loop {
        let adjusted = adjust(&valid, &subject);
        if adjusted.iter().all(|a| a.adjusted_price.is_finite()) {
            break adjusted;
        }

        let before = valid.len();
        valid = valid
            .into_iter()
            .zip(&adjusted)
            .filter(|(_, a)| a.adjusted_price.is_finite())
            .map(|(c, _)| c)
            .collect();
        warn!(
            "Dropped {} of {} comparables with a non-finite adjusted price",
            before - valid.len(),
            before
        );

        if valid.is_empty() {
            return Err(ValuationError::NoValidComparables {
                received: comps.len(),
            });
        }
    };
    let weights = weight(&valid, now);

    // Step 4: Reconcile
    let reconciled = reconcile(&adjusted, &weights);
    debug!(
        "Methods: weighted {:.0}, median {:.0}, average {:.0}",
        reconciled.weighted, reconciled.median, reconciled.average
    );

    // Step 5: Quality and confidence
    let quality = validate(&valid);
    let dispersion = score(&adjusted, reconciled.estimated_value, &valid, &quality, now);

    info!(
        "Valuation complete: ${} (${} - ${}), confidence {}, quality {}, {} comps",
        reconciled.estimated_value,
        dispersion.min_value,
        dispersion.max_value,
        dispersion.confidence,
        quality.quality,
        valid.len()
    );

    Ok(ValuationResult {
        estimated_value: reconciled.estimated_value,
        min_value: dispersion.min_value,
        max_value: dispersion.max_value,
        confidence: dispersion.confidence,
        breakdown: ValuationBreakdown {
            methods: MethodEstimates {
                weighted: reconciled.weighted.round() as i64,
                median: reconciled.median.round() as i64,
                average: reconciled.average.round() as i64,
            },
            std_dev: dispersion.std_dev.round() as i64,
            subject,
            comps_used: valid.len(),
            quality: dispersion.metrics,
        },
    })
}
