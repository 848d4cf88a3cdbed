pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::advisor::handlers as advisor;
use crate::listings::handlers as listings;
use crate::state::AppState;

/// Upload cap for CV files.
const CV_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Listings
        .route("/api/v1/listings/facets", get(listings::handle_facets))
        .route("/api/v1/listings/search", post(listings::handle_search))
        .route("/api/v1/listings/stats", post(listings::handle_stats))
        .route("/api/v1/listings/export", post(listings::handle_export))
        .route("/api/v1/listings/reload", post(listings::handle_reload))
        .route("/api/v1/regions", get(listings::handle_regions))
        // Advisor
        .route("/api/v1/recommendations", post(advisor::handle_recommend))
        .route(
            "/api/v1/cv/analyze",
            post(advisor::handle_analyze_cv).layer(DefaultBodyLimit::max(CV_UPLOAD_LIMIT)),
        )
        .with_state(state)
}
