//! HTTP trigger surface.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | static service identity |
//! | `GET /generate_popular_report` | runs the report once, `{"status": "Ok" \| "failed"}` |

use crate::config::ReportConfig;
use crate::pipeline::run_once;
use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub const SERVICE_NAME: &str = "Mirror TV Ga Report Service";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ReportConfig>,
}

impl AppState {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub status: String,
}

/// GET /
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME,
        status: "ok",
    })
}

/// GET /generate_popular_report
pub async fn generate_popular_report(State(state): State<AppState>) -> Json<GenerateResponse> {
    info!("Popular report requested");
    let status = run_once(&state.config).await;
    Json(GenerateResponse {
        status: status.to_string(),
    })
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/generate_popular_report", get(generate_popular_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
