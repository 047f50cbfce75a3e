//! HTTP API. Drives the lead and export use cases; stateless between requests.

mod error;
mod handlers;

pub use error::ApiError;

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::usecases::{ContentGenerator, ExportService, LeadService};

#[derive(Clone)]
pub struct AppState {
    /// None when no Maps key is configured; search and summarize answer 500.
    pub leads: Option<Arc<LeadService>>,
    pub content: Arc<ContentGenerator>,
    pub export: Arc<ExportService>,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/leads", post(handlers::search_leads))
        .route("/api/leads/summarize", post(handlers::summarize_lead))
        .route("/api/leads/csv", post(handlers::export_csv))
        .route("/api/sync", post(handlers::sync_leads))
        .layer(build_cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
