//! HTTP API - valuation endpoints over the engine and the comp cache

use crate::calculate_cash_offer;
use crate::ingestion::parse::parse_comps;
use crate::ingestion::write::{load_cached_comps, load_subject};
use crate::ingestion::RawComp;
use crate::map::comps_to_geojson;
use crate::valuation::weight::select_best;
use crate::valuation::{
    calculate_value, ComparableSale, SubjectInput, ValuationError, ValuationResult,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use geojson::FeatureCollection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::error;
use uuid::Uuid;

/// Source tag for comps posted directly by a caller
const MANUAL_SOURCE: &str = "manual";

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cash_offer_percent: Decimal,
    pub comp_cache_ttl_days: i64,
    pub max_comps: usize,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Valuation(#[from] ValuationError),
    #[error("property {0} not found")]
    PropertyNotFound(Uuid),
    #[error("database error: {0}")]
    Database(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Database(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Valuation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PropertyNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(e) => {
                error!("Database error: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize, Deserialize)]
pub struct ApiResponse {
    pub message: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRequest {
    pub comps: Vec<RawComp>,
    pub subject_sqft: Option<f64>,
    pub subject_beds: Option<u32>,
    pub subject_baths: Option<f64>,
    /// Reference time for sale recency, defaults to now
    pub as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResponse {
    pub valuation: ValuationResult,
    pub cash_offer: Option<Decimal>,
    pub rejected_records: usize,
}

#[derive(Debug, Deserialize)]
pub struct MapRequest {
    pub comps: Vec<RawComp>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/api/health", get(health_check))
        .route("/api/valuations", post(create_valuation))
        .route("/api/comps/map", post(comps_map))
        .route("/api/properties/:id/valuation", get(property_valuation))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse {
        message: "Cash offer API is running!".to_string(),
        status: "ok".to_string(),
    })
}

async fn create_valuation(
    State(state): State<AppState>,
    Json(request): Json<ValuationRequest>,
) -> Result<Json<ValuationResponse>, ApiError> {
    let (comps, rejected_records) = parse_comps(request.comps, MANUAL_SOURCE);
    let subject = SubjectInput {
        sqft: request.subject_sqft,
        beds: request.subject_beds,
        baths: request.subject_baths,
    };
    let now = request.as_of.unwrap_or_else(Utc::now);

    let valuation = calculate_value(&comps, &subject, now)?;
    let cash_offer = calculate_cash_offer(valuation.estimated_value, state.cash_offer_percent);

    Ok(Json(ValuationResponse {
        valuation,
        cash_offer,
        rejected_records,
    }))
}

async fn comps_map(Json(request): Json<MapRequest>) -> Json<FeatureCollection> {
    let (comps, _) = parse_comps(request.comps, MANUAL_SOURCE);
    Json(comps_to_geojson(&comps))
}

async fn property_valuation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ValuationResponse>, ApiError> {
    let subject_row = load_subject(&state.db, id)
        .await?
        .ok_or(ApiError::PropertyNotFound(id))?;
    let comps = load_cached_comps(&state.db, id, state.comp_cache_ttl_days).await?;

    let subject = SubjectInput {
        sqft: subject_row.sqft,
        beds: subject_row.bedrooms.and_then(|b| u32::try_from(b).ok()),
        baths: subject_row.bathrooms,
    };

    let valuation = value_cached_comps(comps, &subject, state.max_comps, Utc::now())?;
    let cash_offer = calculate_cash_offer(valuation.estimated_value, state.cash_offer_percent);

    Ok(Json(ValuationResponse {
        valuation,
        cash_offer,
        rejected_records: 0,
    }))
}

/// The cache accumulates rows across imports; value only the best `max_comps`
fn value_cached_comps(
    comps: Vec<ComparableSale>,
    subject: &SubjectInput,
    max_comps: usize,
    now: DateTime<Utc>,
) -> Result<ValuationResult, ValuationError> {
    let selected = select_best(comps, max_comps, now);
    calculate_value(&selected, subject, now)
}
