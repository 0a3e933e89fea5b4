//! Core data types for the comp ingestion pipeline
//! Pure data structures with no behavior

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A number as it arrives from an untrusted source - either a JSON number
/// or text such as "$450,000" or "1,850"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Finite numeric value, with currency symbols and separators stripped
    pub fn value(&self) -> Option<f64> {
        let parsed = match self {
            Numeric::Number(n) => Some(*n),
            Numeric::Text(s) => {
                let clean = s.replace(['$', ','], "");
                let clean = clean.trim();
                if clean.is_empty() {
                    None
                } else {
                    clean.parse::<f64>().ok()
                }
            }
        };
        parsed.filter(|v| v.is_finite())
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Numeric::Number(value)
    }
}

/// Comparable sale record as handed over by a data source, before
/// validation. Every field is optional; `parse::parse_comp` decides
/// whether the record is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComp {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(alias = "zip")]
    pub zip_code: Option<String>,

    pub sale_date: Option<String>,
    pub sale_price: Option<Numeric>,

    pub beds: Option<Numeric>,
    pub baths: Option<Numeric>,
    pub sqft: Option<Numeric>,
    pub year_built: Option<Numeric>,
    pub property_type: Option<String>,

    pub source: Option<String>,
    pub distance: Option<Numeric>,
    pub latitude: Option<Numeric>,
    pub longitude: Option<Numeric>,
}

/// Database row from the comparable_sales cache table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompRow {
    pub id: i64,
    pub property_id: Uuid,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub sale_date: NaiveDate,
    pub sale_price: f64,
    pub beds: i32,
    pub baths: f64,
    pub sqft: f64,
    pub year_built: Option<i32>,
    pub property_type: Option<String>,
    pub source: String,
    pub distance: Option<f64>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub cached_at: DateTime<Utc>,
}

/// Subject characteristics stored on the properties table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SubjectRow {
    pub sqft: Option<f64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<f64>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

/// Write operation statistics
#[derive(Debug, Default, Clone)]
pub struct WriteStats {
    pub inserted: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl std::fmt::Display for WriteStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "inserted: {}, skipped: {}, errors: {}",
            self.inserted, self.skipped, self.errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_from_text() {
        assert_eq!(Numeric::Text("$450,000".to_string()).value(), Some(450_000.0));
        assert_eq!(Numeric::Text(" 1,850 ".to_string()).value(), Some(1850.0));
        assert_eq!(Numeric::Text("2.5".to_string()).value(), Some(2.5));
        assert_eq!(Numeric::Text("".to_string()).value(), None);
        assert_eq!(Numeric::Text("call agent".to_string()).value(), None);
        assert_eq!(Numeric::Text("NaN".to_string()).value(), None);
    }

    #[test]
    fn test_raw_comp_accepts_mixed_json() {
        let json = serde_json::json!({
            "address": "12 Oak Ln",
            "zip": "75002",
            "saleDate": "2024-03-01",
            "salePrice": "$310,000",
            "beds": 3,
            "baths": "2.5",
            "sqft": 1720,
            "source": "attom"
        });
        let raw: RawComp = serde_json::from_value(json).unwrap();

        assert_eq!(raw.zip_code.as_deref(), Some("75002"));
        assert_eq!(raw.sale_price.and_then(|p| p.value()), Some(310_000.0));
        assert_eq!(raw.baths.and_then(|b| b.value()), Some(2.5));
        assert!(raw.distance.is_none());
    }
}
