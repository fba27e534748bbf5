//! Request handlers for the HTTP endpoints.

use super::{AppState, error::ApiError};
use crate::core::facade::{self, StorePerformanceReport};
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Body of a restock request.
#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    /// Product to check
    #[serde(rename = "productId")]
    pub product_id: Option<i64>,
}

/// Plain message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome
    pub message: String,
}

/// Optional inclusive date bounds, formatted `YYYY-MM-DD`.
#[derive(Debug, Default, Deserialize)]
pub struct PerformanceQuery {
    /// First day to include
    pub start_date: Option<String>,
    /// Last day to include
    pub end_date: Option<String>,
}

/// `POST /restock` - checks a product's stock and orders more if needed.
#[instrument(skip_all)]
pub async fn restock(
    State(state): State<AppState>,
    payload: Result<Json<RestockRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "Rejected restock body");
        ApiError::BadRequest("Invalid JSON payload.".to_string())
    })?;

    let product_id = match request.product_id {
        Some(id) if id != 0 => id,
        _ => return Err(ApiError::BadRequest("Product ID is required.".to_string())),
    };

    let outcome = facade::restock_product(&state.database, product_id).await?;
    Ok(Json(MessageResponse {
        message: outcome.message(),
    }))
}

/// Fallback for `/restock` with any method other than POST.
pub async fn restock_method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("POST")
}

/// `GET /store-performance` - per-store and per-product sales totals.
#[instrument(skip(state))]
pub async fn store_performance(
    State(state): State<AppState>,
    query: Result<Query<PerformanceQuery>, QueryRejection>,
) -> Result<Json<StorePerformanceReport>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let start = parse_date(query.start_date.as_deref())?;
    let end = parse_date(query.end_date.as_deref())?;

    let report = facade::get_store_performance(&state.database, start, end).await?;
    Ok(Json(report))
}

/// `GET /health` - liveness check.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("Invalid date '{raw}', expected YYYY-MM-DD"))),
    }
}
