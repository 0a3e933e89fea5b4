//! Write functions - cache comps in PostgreSQL and read them back

use crate::ingestion::types::{CompRow, SubjectRow, WriteStats};
use crate::valuation::ComparableSale;
use anyhow::Result;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Cache comps for a property. Duplicate sales (same property, address,
/// sale date and price) are skipped by the table's UNIQUE constraint.
pub async fn write_comps(
    db: &PgPool,
    property_id: Uuid,
    comps: Vec<ComparableSale>,
) -> Result<WriteStats> {
    info!(
        "Writing {} comps for property {} to database",
        comps.len(),
        property_id
    );

    let mut stats = WriteStats::default();

    for comp in comps {
        match insert_comp(db, property_id, &comp).await {
            Ok(true) => stats.inserted += 1,
            Ok(false) => stats.skipped += 1, // Already cached
            Err(e) => {
                warn!("Failed to write comp {}: {}", comp.address, e);
                stats.errors += 1;
            }
        }
    }

    info!("Write complete: {}", stats);

    Ok(stats)
}

/// Insert a single comp, returning true when a row was added
async fn insert_comp(db: &PgPool, property_id: Uuid, comp: &ComparableSale) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO comparable_sales (
            property_id, address, city, state, zip_code, sale_date, sale_price,
            beds, baths, sqft, year_built, property_type, source, distance,
            latitude, longitude, cached_at
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, NOW()
        )
        ON CONFLICT (property_id, address, sale_date, sale_price) DO NOTHING
        "#,
    )
    .bind(property_id)
    .bind(&comp.address)
    .bind(&comp.city)
    .bind(&comp.state)
    .bind(&comp.zip_code)
    .bind(comp.sale_date)
    .bind(comp.sale_price)
    .bind(i32::try_from(comp.beds)?)
    .bind(comp.baths)
    .bind(comp.sqft)
    .bind(comp.year_built)
    .bind(&comp.property_type)
    .bind(&comp.source)
    .bind(comp.distance)
    .bind(comp.latitude)
    .bind(comp.longitude)
    .execute(db)
    .await?;

    let inserted = result.rows_affected() > 0;
    if inserted {
        debug!("Cached comp: {} ({})", comp.address, comp.sale_date);
    }

    Ok(inserted)
}

/// Convert a cached row back into a ComparableSale.
/// Negative bed counts cannot be represented and are mapped to 0, which
/// the normalizer then drops.
pub fn row_to_comp(row: CompRow) -> ComparableSale {
    ComparableSale {
        address: row.address,
        city: row.city,
        state: row.state,
        zip_code: row.zip_code,
        sale_date: row.sale_date,
        sale_price: row.sale_price,
        beds: u32::try_from(row.beds).unwrap_or(0),
        baths: row.baths,
        sqft: row.sqft,
        year_built: row.year_built,
        property_type: row.property_type,
        source: row.source,
        distance: row.distance,
        latitude: row.latitude,
        longitude: row.longitude,
    }
}

/// Load comps cached for a property within the last `max_age_days`
pub async fn load_cached_comps(
    db: &PgPool,
    property_id: Uuid,
    max_age_days: i64,
) -> Result<Vec<ComparableSale>> {
    let cutoff = Utc::now() - Duration::days(max_age_days);

    let rows = sqlx::query_as::<_, CompRow>(
        r#"
        SELECT id, property_id, address, city, state, zip_code, sale_date, sale_price,
               beds, baths, sqft, year_built, property_type, source, distance,
               latitude, longitude, cached_at
        FROM comparable_sales
        WHERE property_id = $1 AND cached_at >= $2
        ORDER BY sale_date DESC
        "#,
    )
    .bind(property_id)
    .bind(cutoff)
    .fetch_all(db)
    .await?;

    debug!(
        "Loaded {} cached comps for property {}",
        rows.len(),
        property_id
    );

    Ok(rows.into_iter().map(row_to_comp).collect())
}

/// Load the subject's own characteristics, `None` if the property is unknown
pub async fn load_subject(db: &PgPool, property_id: Uuid) -> Result<Option<SubjectRow>> {
    let row = sqlx::query_as::<_, SubjectRow>(
        r#"
        SELECT sqft, bedrooms, bathrooms, latitude, longitude
        FROM properties
        WHERE id = $1
        "#,
    )
    .bind(property_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
