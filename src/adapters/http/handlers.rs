use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::AppState;
use super::error::ApiError;
use crate::domain::{ContentTier, DomainError, Lead, SearchQuery};
use crate::usecases::LeadService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SummarizeRequest {
    #[serde(default)]
    pub place_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SummaryResponse {
    pub description: String,
    pub email_content: String,
    pub antigravity_prompt: String,
    pub has_website: bool,
    pub tier: ContentTier,
    pub provider: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct LeadsRequest {
    #[serde(default)]
    pub leads: Vec<Lead>,
}

#[derive(Debug, Serialize)]
pub(super) struct SyncResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct HealthResponse {
    pub status: &'static str,
    pub providers: Vec<&'static str>,
    pub export_configured: bool,
}

fn lead_service(state: &AppState) -> Result<&Arc<LeadService>, ApiError> {
    state
        .leads
        .as_ref()
        .ok_or_else(|| DomainError::ConfigurationMissing("MAPS_API_KEY".to_string()).into())
}

pub(super) async fn search_leads(
    State(state): State<AppState>,
    payload: Result<Json<SearchQuery>, JsonRejection>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    let Json(query) = payload?;
    let service = Arc::clone(lead_service(&state)?);

    // The search runs on its own task; the guard cancels it when the client
    // disconnects and axum drops this future.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let task = tokio::spawn(async move {
        let result = service.search(&query, &cancel).await;
        if matches!(result, Err(DomainError::Cancelled)) {
            info!(
                postal_code = %query.postal_code,
                "search cancelled: client disconnected"
            );
        }
        result
    });

    let leads = task.await.map_err(|e| {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("search task failed: {}", e),
        )
    })??;
    Ok(Json(leads))
}

pub(super) async fn summarize_lead(
    State(state): State<AppState>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(req) = payload?;
    if req.place_id.trim().is_empty() {
        return Err(DomainError::InvalidInput("Place ID is required.".to_string()).into());
    }
    let service = lead_service(&state)?;

    let content = service.summarize(&req.place_id).await?;
    Ok(Json(SummaryResponse {
        description: content.description,
        email_content: content.email,
        antigravity_prompt: content.antigravity_prompt,
        has_website: content.has_website,
        tier: content.tier,
        provider: content.provider,
    }))
}

pub(super) async fn sync_leads(
    State(state): State<AppState>,
    payload: Result<Json<LeadsRequest>, JsonRejection>,
) -> Result<Json<SyncResponse>, ApiError> {
    let Json(req) = payload?;
    let written = state.export.sync_to_sheet(&req.leads).await?;
    info!(leads = written, "sync request complete");
    Ok(Json(SyncResponse {
        success: true,
        message: "Successfully synced to Google Sheets!".to_string(),
    }))
}

pub(super) async fn export_csv(
    State(state): State<AppState>,
    payload: Result<Json<LeadsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let body = state.export.to_csv(&req.leads)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"leads.csv\"",
            ),
        ],
        body,
    ))
}

pub(super) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: if state.leads.is_some() { "ok" } else { "degraded" },
        providers: state.content.chain(),
        export_configured: state.export.is_configured(),
    })
}
