//! Comp import orchestrator - runs fetch/parse, enrich, write pipelines
//!
//! Usage:
//!   comp-import csv <property-uuid> <file.csv>
//!   comp-import fetch <property-uuid> <address>

use anyhow::{anyhow, Context, Result};
use cash_offer_backend::config::Config;
use cash_offer_backend::ingestion::enrich::{enrich_all, GeoPoint};
use cash_offer_backend::ingestion::fetch::CompsClient;
use cash_offer_backend::ingestion::parse::{parse_comps, parse_comps_csv};
use cash_offer_backend::ingestion::write::{load_subject, write_comps};
use cash_offer_backend::ingestion::WriteStats;
use cash_offer_backend::logging::init_logging;
use cash_offer_backend::valuation::ComparableSale;
use chrono::Utc;
use sqlx::PgPool;
use std::env;
use std::path::PathBuf;
use tracing::{error, info};
use uuid::Uuid;

/// Where a batch of comps comes from
enum CompSource {
    Csv(PathBuf),
    Api { address: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env()?;
    init_logging(&config.log_level)?;

    info!("Starting comp import pipeline");

    let args: Vec<String> = env::args().collect();
    let (property_id, source) = parse_args(&args)?;

    // Connect to database
    let db = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Database connected");

    match run_import(&config, &db, property_id, source).await {
        Ok(stats) => info!("✓ Import for {} completed: {}", property_id, stats),
        Err(e) => {
            error!("✗ Import for {} failed: {:#}", property_id, e);
            return Err(e);
        }
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<(Uuid, CompSource)> {
    let usage = "usage: comp-import <csv|fetch> <property-uuid> <file.csv|address>";

    let (mode, id, target) = match args {
        [_, mode, id, target, ..] => (mode.as_str(), id, target),
        _ => return Err(anyhow!(usage)),
    };

    let property_id = Uuid::parse_str(id).with_context(|| format!("Invalid property id {}", id))?;

    let source = match mode {
        "csv" => CompSource::Csv(PathBuf::from(target)),
        "fetch" => CompSource::Api {
            address: args[3..].join(" "),
        },
        other => return Err(anyhow!("Unknown mode {}; {}", other, usage)),
    };

    Ok((property_id, source))
}

/// Run a single comp import for one property
async fn run_import(
    config: &Config,
    db: &PgPool,
    property_id: Uuid,
    source: CompSource,
) -> Result<WriteStats> {
    info!("=== Comp Import Pipeline ===");

    // Step 1: Load or fetch comps
    info!("Step 1/3: Loading comps...");
    let comps: Vec<ComparableSale> = match source {
        CompSource::Csv(path) => parse_comps_csv(&path, "manual")?,
        CompSource::Api { address } => {
            let client = CompsClient::new(config.comps_api_url.clone(), config.comps_api_key.clone())?;
            let raws = client
                .fetch_comps(&address, config.search_radius_miles, config.max_comps * 2)
                .await?;
            let (comps, _) = parse_comps(raws, "attom");
            comps
        }
    };
    info!("✓ Loaded {} comps", comps.len());

    // Step 2: Enrich (fill distances, keep the best comps)
    info!("Step 2/3: Enriching comps...");
    let subject_location = load_subject(db, property_id)
        .await?
        .and_then(|s| GeoPoint::from_decimals(s.latitude, s.longitude));
    let enriched = enrich_all(comps, subject_location, config.max_comps, Utc::now());
    info!("✓ Enriched {} comps", enriched.len());

    // Step 3: Write to cache
    info!("Step 3/3: Writing to database...");
    let stats = write_comps(db, property_id, enriched).await?;
    info!("✓ Write complete");

    Ok(stats)
}
