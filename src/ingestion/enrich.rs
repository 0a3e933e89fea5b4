//! Enrichment functions - add derived data to comps before caching

use crate::valuation::weight::select_best;
use crate::valuation::ComparableSale;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};

const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A point on the map, in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn from_decimals(latitude: Option<Decimal>, longitude: Option<Decimal>) -> Option<Self> {
        match (latitude?.to_f64(), longitude?.to_f64()) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// Great-circle distance in miles
pub fn haversine_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

/// Fill a missing distance from coordinates.
/// Pure function - comps that already carry a distance pass through.
pub fn fill_distance(comp: ComparableSale, subject: Option<GeoPoint>) -> ComparableSale {
    if comp.distance.is_some() {
        return comp;
    }

    let (Some(subject), Some(location)) = (
        subject,
        GeoPoint::from_decimals(comp.latitude, comp.longitude),
    ) else {
        return comp;
    };

    let miles = haversine_miles(subject, location);
    debug!("Computed distance for {}: {:.2} miles", comp.address, miles);

    ComparableSale {
        distance: Some(miles),
        ..comp
    }
}

/// Run all enrichment steps in sequence: fill distances, then keep the
/// `limit` closest and most recent sales
pub fn enrich_all(
    comps: Vec<ComparableSale>,
    subject: Option<GeoPoint>,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<ComparableSale> {
    info!("Enriching {} comps", comps.len());

    let filled: Vec<ComparableSale> = comps
        .into_iter()
        .map(|comp| fill_distance(comp, subject))
        .collect();

    let before = filled.len();
    let selected = select_best(filled, limit, now);

    info!(
        "Enrichment complete: kept {} of {} comps",
        selected.len(),
        before
    );

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn mock_comp(distance: Option<f64>) -> ComparableSale {
        ComparableSale {
            address: "10 Smith St".to_string(),
            city: "Dallas".to_string(),
            state: "TX".to_string(),
            zip_code: "75201".to_string(),
            sale_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            sale_price: 250_000.0,
            beds: 3,
            baths: 2.0,
            sqft: 1500.0,
            year_built: None,
            property_type: None,
            source: "attom".to_string(),
            distance,
            latitude: Some(Decimal::new(32_7767, 4)),
            longitude: Some(Decimal::new(-96_7970, 4)),
        }
    }

    fn subject() -> GeoPoint {
        GeoPoint {
            latitude: 32.7767,
            longitude: -96.7970,
        }
    }

    #[test]
    fn test_haversine_known_distance() {
        // Dallas to Fort Worth is roughly 30 miles
        let fort_worth = GeoPoint {
            latitude: 32.7555,
            longitude: -97.3308,
        };
        let miles = haversine_miles(subject(), fort_worth);
        assert!(miles > 29.0 && miles < 32.0);
    }

    #[test]
    fn test_fill_distance_from_coordinates() {
        let enriched = fill_distance(mock_comp(None), Some(subject()));
        let distance = enriched.distance.unwrap();
        assert!(distance.abs() < 1e-6);
    }

    #[test]
    fn test_existing_distance_is_kept() {
        let enriched = fill_distance(mock_comp(Some(1.2)), Some(subject()));
        assert_eq!(enriched.distance, Some(1.2));
    }

    #[test]
    fn test_no_subject_location() {
        let enriched = fill_distance(mock_comp(None), None);
        assert_eq!(enriched.distance, None);
    }

    #[test]
    fn test_enrich_all_trims_to_limit() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let comps: Vec<_> = (0..15).map(|i| mock_comp(Some(i as f64 * 0.25))).collect();

        let kept = enrich_all(comps, Some(subject()), 10, now);

        assert_eq!(kept.len(), 10);
        assert_eq!(kept[0].distance, Some(0.0));
        assert!(kept.iter().all(|c| c.distance.unwrap() < 2.5));
    }
}
