//! Parse functions - validate raw comp records into ComparableSale structs

use crate::ingestion::types::{Numeric, RawComp};
use crate::valuation::ComparableSale;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Only the first few failures are logged per batch
const MAX_LOGGED_ERRORS: usize = 10;

/// Comp CSV row structure. Headers follow the snake_case field names;
/// every column is optional text and is validated by `parse_comp`.
#[derive(Debug, Deserialize)]
struct CompCsvRow {
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    #[serde(alias = "zip")]
    zip_code: Option<String>,
    sale_date: Option<String>,
    sale_price: Option<String>,
    beds: Option<String>,
    baths: Option<String>,
    sqft: Option<String>,
    year_built: Option<String>,
    property_type: Option<String>,
    source: Option<String>,
    distance: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
}

impl From<CompCsvRow> for RawComp {
    fn from(row: CompCsvRow) -> Self {
        let text = |s: Option<String>| s.filter(|v| !v.trim().is_empty()).map(Numeric::Text);

        RawComp {
            address: row.address,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            sale_date: row.sale_date,
            sale_price: text(row.sale_price),
            beds: text(row.beds),
            baths: text(row.baths),
            sqft: text(row.sqft),
            year_built: text(row.year_built),
            property_type: row.property_type.filter(|s| !s.trim().is_empty()),
            source: row.source.filter(|s| !s.trim().is_empty()),
            distance: text(row.distance),
            latitude: text(row.latitude),
            longitude: text(row.longitude),
        }
    }
}

/// Parse a sale date in ISO (YYYY-MM-DD), RFC 3339, or US (MM/DD/YYYY) form
pub fn parse_sale_date(date_str: &str) -> Option<NaiveDate> {
    let s = date_str.trim();

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| NaiveDate::parse_from_str(s, "%m/%d/%Y").ok())
}

fn required(field: &Option<Numeric>, name: &str) -> Result<f64> {
    field
        .as_ref()
        .and_then(Numeric::value)
        .ok_or_else(|| anyhow!("missing or non-numeric {}", name))
}

fn coordinate(field: &Option<Numeric>) -> Option<Decimal> {
    field
        .as_ref()
        .and_then(Numeric::value)
        .and_then(|v| Decimal::try_from(v).ok())
}

/// Validate one raw record. Rejects records whose required numbers are
/// missing, non-numeric or non-finite; range checks (price > 0 etc.) are
/// left to the valuation normalizer.
pub fn parse_comp(raw: RawComp, default_source: &str) -> Result<ComparableSale> {
    let sale_price = required(&raw.sale_price, "sale price")?;
    let sqft = required(&raw.sqft, "sqft")?;
    let beds = required(&raw.beds, "beds")?;
    let baths = required(&raw.baths, "baths")?;

    if beds < 0.0 {
        return Err(anyhow!("negative bed count {}", beds));
    }

    let sale_date = raw
        .sale_date
        .as_deref()
        .and_then(parse_sale_date)
        .ok_or_else(|| anyhow!("missing or unreadable sale date {:?}", raw.sale_date))?;

    // Text that is present but unreadable is treated as unknown
    let distance = raw.distance.as_ref().and_then(Numeric::value);
    let year_built = raw
        .year_built
        .as_ref()
        .and_then(Numeric::value)
        .map(|y| y.round() as i32);

    Ok(ComparableSale {
        address: raw.address.unwrap_or_default(),
        city: raw.city.unwrap_or_default(),
        state: raw.state.unwrap_or_default(),
        zip_code: raw.zip_code.unwrap_or_default(),
        sale_date,
        sale_price,
        beds: beds.round() as u32,
        baths,
        sqft,
        year_built,
        property_type: raw.property_type,
        source: raw
            .source
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_else(|| default_source.to_string()),
        distance,
        latitude: coordinate(&raw.latitude),
        longitude: coordinate(&raw.longitude),
    })
}

/// Parse a batch, skipping records that fail validation.
/// Returns the parsed comps and the number of rejected records.
pub fn parse_comps(raws: Vec<RawComp>, default_source: &str) -> (Vec<ComparableSale>, usize) {
    let mut comps = Vec::new();
    let mut parse_errors = 0;

    for (idx, raw) in raws.into_iter().enumerate() {
        match parse_comp(raw, default_source) {
            Ok(comp) => comps.push(comp),
            Err(e) => {
                parse_errors += 1;
                if parse_errors <= MAX_LOGGED_ERRORS {
                    warn!("Rejected comp record {}: {}", idx, e);
                }
            }
        }
    }

    if parse_errors > 0 {
        info!(
            "Parsed {} comps ({} records rejected)",
            comps.len(),
            parse_errors
        );
    }

    (comps, parse_errors)
}

/// Parse a comp CSV file into ComparableSale structs
pub fn parse_comps_csv(path: &Path, default_source: &str) -> Result<Vec<ComparableSale>> {
    info!("Parsing comp CSV from {:?}", path);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut raws = Vec::new();
    let mut row_errors = 0;

    for (idx, result) in reader.deserialize::<CompCsvRow>().enumerate() {
        match result {
            Ok(row) => raws.push(RawComp::from(row)),
            Err(e) => {
                row_errors += 1;
                if row_errors <= MAX_LOGGED_ERRORS {
                    warn!("Failed to deserialize row {}: {}", idx, e);
                }
            }
        }
    }

    let (comps, rejected) = parse_comps(raws, default_source);

    info!(
        "Parsed {} comps from CSV ({} errors)",
        comps.len(),
        row_errors + rejected
    );

    Ok(comps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn raw() -> RawComp {
        RawComp {
            address: Some("10 Smith St".to_string()),
            city: Some("Dallas".to_string()),
            state: Some("TX".to_string()),
            zip_code: Some("75201".to_string()),
            sale_date: Some("2024-02-10".to_string()),
            sale_price: Some(Numeric::Text("$275,000".to_string())),
            beds: Some(3.0.into()),
            baths: Some(2.0.into()),
            sqft: Some(1650.0.into()),
            year_built: None,
            property_type: None,
            source: Some("ATTOM".to_string()),
            distance: Some(0.4.into()),
            latitude: Some(32.78.into()),
            longitude: Some((-96.8).into()),
        }
    }

    #[test]
    fn test_parse_sale_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        assert_eq!(parse_sale_date("2023-12-25"), Some(expected));
        assert_eq!(parse_sale_date("2023-12-25T15:30:00Z"), Some(expected));
        assert_eq!(parse_sale_date("12/25/2023"), Some(expected));
        assert_eq!(parse_sale_date("invalid"), None);
    }

    #[test]
    fn test_parse_comp() {
        let comp = parse_comp(raw(), "manual").unwrap();

        assert_eq!(comp.sale_price, 275_000.0);
        assert_eq!(comp.beds, 3);
        assert_eq!(comp.source, "attom");
        assert_eq!(comp.distance, Some(0.4));
        assert!(comp.latitude.is_some());
    }

    #[test]
    fn test_missing_price_is_rejected() {
        let mut r = raw();
        r.sale_price = Some(Numeric::Text("n/a".to_string()));
        assert!(parse_comp(r, "manual").is_err());
    }

    #[test]
    fn test_missing_date_is_rejected() {
        let mut r = raw();
        r.sale_date = None;
        assert!(parse_comp(r, "manual").is_err());
    }

    #[test]
    fn test_default_source_applied() {
        let mut r = raw();
        r.source = None;
        assert_eq!(parse_comp(r, "manual").unwrap().source, "manual");
    }

    #[test]
    fn test_unreadable_distance_becomes_unknown() {
        let mut r = raw();
        r.distance = Some(Numeric::Text("unknown".to_string()));
        assert_eq!(parse_comp(r, "manual").unwrap().distance, None);
    }

    #[test]
    fn test_parse_comps_counts_rejections() {
        let mut bad = raw();
        bad.sqft = None;
        let (comps, rejected) = parse_comps(vec![raw(), bad, raw()], "manual");
        assert_eq!(comps.len(), 2);
        assert_eq!(rejected, 1);
    }

    #[test]
    fn test_parse_comps_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "address,city,state,zip_code,sale_date,sale_price,beds,baths,sqft,source,distance"
        )
        .unwrap();
        writeln!(file, "1 Elm St,Austin,TX,78701,2024-01-05,\"$410,000\",3,2,1800,attom,0.5").unwrap();
        writeln!(file, "2 Elm St,Austin,TX,78701,01/20/2024,395000,3,2.5,1750,,").unwrap();
        writeln!(file, "3 Elm St,Austin,TX,78701,2024-01-05,,3,2,1800,attom,0.5").unwrap();
        file.flush().unwrap();

        let comps = parse_comps_csv(file.path(), "manual").unwrap();

        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].sale_price, 410_000.0);
        assert_eq!(comps[1].source, "manual");
        assert_eq!(comps[1].distance, None);
        assert_eq!(comps[1].baths, 2.5);
    }
}
