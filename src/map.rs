//! GeoJSON export of comps for map views

use crate::valuation::ComparableSale;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use rust_decimal::prelude::ToPrimitive;

fn to_feature(comp: &ComparableSale) -> Option<Feature> {
    let longitude = comp.longitude?.to_f64()?;
    let latitude = comp.latitude?.to_f64()?;

    let mut properties = JsonObject::new();
    properties.insert("address".to_string(), comp.address.clone().into());
    properties.insert("salePrice".to_string(), comp.sale_price.into());
    properties.insert("saleDate".to_string(), comp.sale_date.to_string().into());
    properties.insert("distance".to_string(), comp.distance.into());
    properties.insert("source".to_string(), comp.source.clone().into());

    Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![longitude, latitude]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Point features for every comp that has coordinates
pub fn comps_to_geojson(comps: &[ComparableSale]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: comps.iter().filter_map(to_feature).collect(),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn mock_comp(lat: Option<Decimal>, lon: Option<Decimal>) -> ComparableSale {
        ComparableSale {
            address: "5 Pine Rd".to_string(),
            city: "Denver".to_string(),
            state: "CO".to_string(),
            zip_code: "80205".to_string(),
            sale_date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            sale_price: 515_000.0,
            beds: 3,
            baths: 2.0,
            sqft: 1600.0,
            year_built: None,
            property_type: None,
            source: "attom".to_string(),
            distance: None,
            latitude: lat,
            longitude: lon,
        }
    }

    #[test]
    fn test_comps_without_coordinates_are_skipped() {
        let comps = vec![
            mock_comp(Some(Decimal::new(39_7392, 4)), Some(Decimal::new(-104_9903, 4))),
            mock_comp(None, Some(Decimal::new(-104_9903, 4))),
        ];
        let collection = comps_to_geojson(&comps);
        assert_eq!(collection.features.len(), 1);
    }

    #[test]
    fn test_point_is_lon_lat() {
        let comps = vec![mock_comp(
            Some(Decimal::new(39_7392, 4)),
            Some(Decimal::new(-104_9903, 4)),
        )];
        let json = serde_json::to_value(comps_to_geojson(&comps)).unwrap();
        let coords = &json["features"][0]["geometry"]["coordinates"];

        assert!((coords[0].as_f64().unwrap() + 104.9903).abs() < 1e-9);
        assert!((coords[1].as_f64().unwrap() - 39.7392).abs() < 1e-9);
        assert_eq!(json["features"][0]["properties"]["salePrice"], 515_000.0);
        assert!(json["features"][0]["properties"]["distance"].is_null());
    }
}
