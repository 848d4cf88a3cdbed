use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::advisor::cv::{analyze_cv, CvEvaluation};
use crate::advisor::keywords::{generate_keywords, recommend};
use crate::advisor::resume::extract_resume_text;
use crate::errors::AppError;
use crate::listings::filter::{apply, FilterCriteria};
use crate::listings::rank::RankedListing;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub position: String,
    #[serde(default)]
    pub criteria: FilterCriteria,
    pub api_key: Option<String>,
}

#[derive(Serialize)]
pub struct RecommendResponse<'a> {
    pub keywords: Vec<String>,
    pub results: Vec<RankedListing<'a>>,
}

/// POST /api/v1/recommendations
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Response, AppError> {
    let position = req.position.trim();
    if position.is_empty() {
        return Err(AppError::Validation("A position is required".to_string()));
    }

    let dataset = state.datasets.current().await?;
    let keywords = generate_keywords(state.llm.as_ref(), position, req.api_key.as_deref()).await?;
    info!(position, keywords = keywords.len(), "Generated recommendation keywords");

    let view = apply(&dataset.listings, &req.criteria);
    let results = recommend(view, &keywords);
    Ok(Json(RecommendResponse { keywords, results }).into_response())
}

/// Fields of the CV analysis form.
#[derive(Debug, Default)]
struct CvForm {
    file_name: Option<String>,
    file: Option<Bytes>,
    slug: Option<String>,
    criteria: FilterCriteria,
    api_key: Option<String>,
}

impl CvForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, AppError> {
        let mut form = CvForm::default();
        while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    form.file_name = field.file_name().map(str::to_string);
                    form.file = Some(field.bytes().await.map_err(bad_form)?);
                }
                "slug" => form.slug = Some(field.text().await.map_err(bad_form)?),
                "criteria" => {
                    let raw = field.text().await.map_err(bad_form)?;
                    if !raw.trim().is_empty() {
                        form.criteria = serde_json::from_str(&raw).map_err(|e| {
                            AppError::Validation(format!("Invalid criteria: {e}"))
                        })?;
                    }
                }
                "api_key" => form.api_key = Some(field.text().await.map_err(bad_form)?),
                _ => {}
            }
        }
        Ok(form)
    }
}

fn bad_form(err: MultipartError) -> AppError {
    AppError::Validation(format!("Malformed upload: {err}"))
}

/// POST /api/v1/cv/analyze
pub async fn handle_analyze_cv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CvEvaluation>, AppError> {
    let form = CvForm::read(&mut multipart).await?;

    let file = form
        .file
        .ok_or_else(|| AppError::Validation("A CV file is required".to_string()))?;
    let slug = form
        .slug
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("A listing slug is required".to_string()))?;

    let dataset = state.datasets.current().await?;
    let listing = apply(&dataset.listings, &form.criteria)
        .into_iter()
        .find(|r| r.slug == slug)
        .ok_or_else(|| {
            AppError::NotFound(format!("Listing '{slug}' is not in the current selection"))
        })?;

    let file_name = form.file_name.unwrap_or_default();
    let resume_text = tokio::task::spawn_blocking(move || extract_resume_text(&file_name, &file))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let evaluation = analyze_cv(
        state.llm.as_ref(),
        state.definitions.as_ref(),
        listing,
        &resume_text,
        &state.cv_procedure,
        form.api_key.as_deref(),
    )
    .await?;
    Ok(Json(evaluation))
}
