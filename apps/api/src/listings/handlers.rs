use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::listings::export::{to_csv, EXPORT_FILE_NAME};
use crate::listings::facets::{build_facets, Facets};
use crate::listings::filter::{apply, FilterCriteria};
use crate::listings::models::ListingRecord;
use crate::listings::page::{paginate, Page, PAGE_SIZE};
use crate::listings::regions::RegionWhitelist;
use crate::listings::stats::{build_report, compute_metrics, Metrics, StatsReport};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub criteria: FilterCriteria,
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

#[derive(Serialize)]
pub struct SearchResponse<'a> {
    pub metrics: Metrics,
    pub updated_on: Option<NaiveDate>,
    pub results: Page<&'a ListingRecord>,
}

/// GET /api/v1/listings/facets
pub async fn handle_facets(State(state): State<AppState>) -> Result<Json<Facets>, AppError> {
    let dataset = state.datasets.current().await?;
    Ok(Json(build_facets(&dataset, &state.regions)))
}

/// POST /api/v1/listings/search
pub async fn handle_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Response, AppError> {
    let dataset = state.datasets.current().await?;
    let view = apply(&dataset.listings, &req.criteria);

    let response = SearchResponse {
        metrics: compute_metrics(dataset.listings.len(), &view),
        updated_on: dataset.updated_on,
        results: paginate(&view, req.page, PAGE_SIZE),
    };
    Ok(Json(response).into_response())
}

/// POST /api/v1/listings/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    Json(criteria): Json<FilterCriteria>,
) -> Result<Json<StatsReport>, AppError> {
    let dataset = state.datasets.current().await?;
    let view = apply(&dataset.listings, &criteria);
    Ok(Json(build_report(dataset.listings.len(), &view)))
}

/// POST /api/v1/listings/export
pub async fn handle_export(
    State(state): State<AppState>,
    Json(criteria): Json<FilterCriteria>,
) -> Result<Response, AppError> {
    let dataset = state.datasets.current().await?;
    let view = apply(&dataset.listings, &criteria);
    let body = to_csv(&view).map_err(|e| AppError::Internal(e.into()))?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
        ),
    ];
    Ok((headers, body).into_response())
}

/// POST /api/v1/listings/reload
/// Drops the cached snapshot and loads the current one.
pub async fn handle_reload(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.datasets.invalidate();
    let dataset = state.datasets.current().await?;
    info!(listings = dataset.listings.len(), "Listing snapshot reloaded");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/regions
pub async fn handle_regions(State(state): State<AppState>) -> Json<RegionWhitelist> {
    Json(state.regions.as_ref().clone())
}
