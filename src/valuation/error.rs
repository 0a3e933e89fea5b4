use thiserror::Error;

/// Failures that stop a valuation outright
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValuationError {
    #[error("no valid comparables: {received} supplied, none usable (need sale price, sqft and beds > 0)")]
    NoValidComparables { received: usize },
}
