//! Automated valuation model - turns comparable sales into a point
//! estimate, an interval and a confidence score
//!
//! Pipeline: normalize -> adjust -> weight -> reconcile -> score, with the
//! quality validator feeding the confidence score. Every stage is a pure
//! function; `engine::calculate_value` composes them.

pub mod adjust;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod quality;
pub mod reconcile;
pub mod score;
pub mod stats;
pub mod subject;
pub mod types;
pub mod weight;

pub use engine::calculate_value;
pub use error::ValuationError;
pub use types::*;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::types::ComparableSale;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    /// Fixed clock so recency math is reproducible
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    /// Attom-sourced comp sold 30 days ago, zero miles from the subject
    pub fn comp(price: f64, sqft: f64, beds: u32, baths: f64) -> ComparableSale {
        ComparableSale {
            address: "10 Test St".to_string(),
            city: "Testville".to_string(),
            state: "TX".to_string(),
            zip_code: "75001".to_string(),
            sale_date: now().date_naive() - Duration::days(30),
            sale_price: price,
            beds,
            baths,
            sqft,
            year_built: Some(1995),
            property_type: Some("single_family".to_string()),
            source: "attom".to_string(),
            distance: Some(0.0),
            latitude: None,
            longitude: None,
        }
    }

    /// $200k comp matching the default subject, sold `days` ago
    pub fn comp_sold(days: i64, distance: Option<f64>) -> ComparableSale {
        ComparableSale {
            sale_date: now().date_naive() - Duration::days(days),
            distance,
            ..comp(200_000.0, 1500.0, 3, 2.0)
        }
    }
}
