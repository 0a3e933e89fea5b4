//! Recency/proximity weighter

use crate::valuation::types::ComparableSale;
use chrono::{DateTime, NaiveTime, Utc};

/// Linear recency decay window
const RECENCY_WINDOW_DAYS: f64 = 365.0;
/// Old comps keep at least this share of their weight
const RECENCY_FLOOR: f64 = 0.3;
/// Miles at which proximity weight halves
const DISTANCE_HALF_WEIGHT_MILES: f64 = 2.0;

/// Whole days between the sale and `now`, floored. Sales dated in the
/// future count as sold today.
pub fn days_ago(comp: &ComparableSale, now: DateTime<Utc>) -> i64 {
    let sold_at = comp.sale_date.and_time(NaiveTime::MIN).and_utc();
    (now - sold_at).num_days().max(0)
}

pub fn recency_weight(days_ago: i64) -> f64 {
    (1.0 - days_ago as f64 / RECENCY_WINDOW_DAYS).max(RECENCY_FLOOR)
}

pub fn distance_weight(distance_miles: f64) -> f64 {
    1.0 / (1.0 + distance_miles / DISTANCE_HALF_WEIGHT_MILES)
}

/// Un-normalized recency x proximity weight
pub fn raw_weight(comp: &ComparableSale, now: DateTime<Utc>) -> f64 {
    recency_weight(days_ago(comp, now)) * distance_weight(comp.distance_or_zero())
}

/// Weights in input order, normalized to sum to 1
pub fn weight(comps: &[ComparableSale], now: DateTime<Utc>) -> Vec<f64> {
    let raw: Vec<f64> = comps.iter().map(|c| raw_weight(c, now)).collect();
    let total: f64 = raw.iter().sum();

    if total > 0.0 && total.is_finite() {
        raw.iter().map(|w| w / total).collect()
    } else {
        vec![1.0 / comps.len() as f64; comps.len()]
    }
}

/// Keep the `limit` comps with the highest raw weight, best first
pub fn select_best(
    comps: Vec<ComparableSale>,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<ComparableSale> {
    let mut ranked: Vec<(f64, ComparableSale)> =
        comps.into_iter().map(|c| (raw_weight(&c, now), c)).collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.into_iter().take(limit).map(|(_, c)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::fixtures::{comp_sold, now};

    #[test]
    fn test_recency_decay_and_floor() {
        assert_eq!(recency_weight(0), 1.0);
        assert!((recency_weight(182) - (1.0 - 182.0 / 365.0)).abs() < 1e-12);
        // 1 - 300/365 is ~0.18, below the floor
        assert_eq!(recency_weight(300), 0.3);
        assert_eq!(recency_weight(365), 0.3);
        assert_eq!(recency_weight(2000), 0.3);
    }

    #[test]
    fn test_distance_decay() {
        assert_eq!(distance_weight(0.0), 1.0);
        assert_eq!(distance_weight(2.0), 0.5);
        assert!(distance_weight(100.0) > 0.0);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let comps = vec![
            comp_sold(10, Some(0.2)),
            comp_sold(200, Some(1.5)),
            comp_sold(800, Some(4.0)),
            comp_sold(45, None),
        ];
        let weights = weight(&comps, now());
        let total: f64 = weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(weights[0] > weights[1]);
        assert!(weights[1] > weights[2]);
    }

    #[test]
    fn test_future_sale_date_is_clamped() {
        let future = comp_sold(-30, Some(0.0));
        assert_eq!(days_ago(&future, now()), 0);
        assert_eq!(raw_weight(&future, now()), 1.0);
    }

    #[test]
    fn test_days_ago_floors_partial_days() {
        // Sold 10 days before a mid-day `now`
        let c = comp_sold(10, None);
        assert_eq!(days_ago(&c, now()), 10);
    }

    #[test]
    fn test_select_best_prefers_close_recent_sales() {
        let comps = vec![
            comp_sold(400, Some(3.0)),
            comp_sold(5, Some(0.1)),
            comp_sold(100, Some(0.5)),
        ];
        let best = select_best(comps, 2, now());
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].distance, Some(0.1));
        assert_eq!(best[1].distance, Some(0.5));
    }
}
