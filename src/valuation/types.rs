//! Core data types for the valuation pipeline
//! Pure data structures with no behavior beyond small accessors

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market baseline used when the subject cannot be described any other way
pub const DEFAULT_SUBJECT_SQFT: f64 = 1500.0;
pub const DEFAULT_SUBJECT_BEDS: u32 = 3;
pub const DEFAULT_SUBJECT_BATHS: f64 = 2.0;

/// A recently sold property used as a reference point for the subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparableSale {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,

    pub sale_date: NaiveDate,
    pub sale_price: f64,

    pub beds: u32,
    pub baths: f64,
    pub sqft: f64,
    pub year_built: Option<i32>,
    pub property_type: Option<String>,

    /// Provenance tag, e.g. "attom", "manual" or "demo"
    pub source: String,

    /// Miles from the subject. `None` means the data source did not say.
    pub distance: Option<f64>,

    // Geolocation, only used for map export
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

impl ComparableSale {
    /// Distance in miles, with unknown treated as co-located
    pub fn distance_or_zero(&self) -> f64 {
        self.distance.unwrap_or(0.0)
    }

    pub fn is_demo(&self) -> bool {
        self.source == "demo"
    }
}

/// Physical characteristics of the property being valued
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectProperty {
    pub sqft: f64,
    pub beds: u32,
    pub baths: f64,
}

impl Default for SubjectProperty {
    fn default() -> Self {
        SubjectProperty {
            sqft: DEFAULT_SUBJECT_SQFT,
            beds: DEFAULT_SUBJECT_BEDS,
            baths: DEFAULT_SUBJECT_BATHS,
        }
    }
}

/// Caller-supplied subject characteristics; gaps are inferred from the comps
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectInput {
    pub sqft: Option<f64>,
    pub beds: Option<u32>,
    pub baths: Option<f64>,
}

/// A comp after characteristic adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedComp {
    pub original_price: f64,
    pub adjusted_price: f64,
    pub adjustments: f64,
    pub adjustment_percent: f64,
}

/// Coarse reliability judgment of a comp set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityTier {
    /// Confidence points contributed by this tier
    pub fn confidence_bonus(&self) -> i32 {
        match self {
            QualityTier::Excellent => 10,
            QualityTier::Good => 5,
            QualityTier::Fair => 0,
            QualityTier::Poor => -5,
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityTier::Excellent => write!(f, "excellent"),
            QualityTier::Good => write!(f, "good"),
            QualityTier::Fair => write!(f, "fair"),
            QualityTier::Poor => write!(f, "poor"),
        }
    }
}

/// Outcome of the comp quality validator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub is_valid: bool,
    pub quality: QualityTier,
    pub issues: Vec<String>,
}

/// The three independent point estimates and their blend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciliation {
    pub weighted: f64,
    pub median: f64,
    pub average: f64,
    pub estimated_value: i64,
}

/// Interval, confidence and the metrics that fed the confidence score
#[derive(Debug, Clone, PartialEq)]
pub struct Dispersion {
    pub std_dev: f64,
    pub min_value: i64,
    pub max_value: i64,
    pub confidence: u8,
    pub metrics: QualityMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodEstimates {
    pub weighted: i64,
    pub median: i64,
    pub average: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    /// Miles, rounded to one decimal place
    pub avg_distance: f64,
    pub avg_days_old: i64,
    /// Distinct sources in first-seen order
    pub sources: Vec<String>,
    pub tier: QualityTier,
    pub issues: Vec<String>,
    pub comps_without_distance: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationBreakdown {
    pub methods: MethodEstimates,
    pub std_dev: i64,
    pub subject: SubjectProperty,
    pub comps_used: usize,
    pub quality: QualityMetrics,
}

/// Immutable snapshot of one estimation run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub estimated_value: i64,
    pub min_value: i64,
    pub max_value: i64,
    /// Heuristic 0-95 trust score, not a statistical confidence level
    pub confidence: u8,
    pub breakdown: ValuationBreakdown,
}
