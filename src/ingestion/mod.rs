//! Comp ingestion module - functional pipeline feeding the valuation engine

pub mod enrich;
pub mod fetch;
pub mod parse;
pub mod types;
pub mod write;

pub use types::*;
