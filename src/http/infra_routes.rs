//! Log-Infra API routes (spec §6.2).

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{DaemonError, Result};
use crate::infra::LogInfraOrchestrator;

use super::state::InfraApiState;

#[derive(Debug, Deserialize)]
struct CreateServicesRequest {
    admin_password: String,
}

pub fn router(orchestrator: Arc<LogInfraOrchestrator>) -> Router {
    let state = InfraApiState { orchestrator };

    Router::new()
        .route("/healthz", get(healthz))
        .route("/create", post(create))
        .route("/start", post(start))
        .route("/stop", post(stop))
        .route("/delete", delete(delete_services))
        .route("/status", get(status))
        .route("/services", get(services))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn create(
    State(state): State<InfraApiState>,
    Json(req): Json<CreateServicesRequest>,
) -> Result<impl IntoResponse> {
    if req.admin_password.len() < 8 {
        return Err(DaemonError::BadRequest(
            "admin_password must be at least 8 characters".into(),
        ));
    }
    state.orchestrator.create_all(&req.admin_password).await?;
    Ok(Json(json!({ "message": "All services created successfully." })))
}

async fn start(State(state): State<InfraApiState>) -> Result<impl IntoResponse> {
    let missing = state.orchestrator.missing().await;
    if !missing.is_empty() {
        return Err(DaemonError::BadRequest(format!(
            "cannot start services, missing: {}",
            missing.join(", ")
        )));
    }
    state.orchestrator.start_all().await?;
    Ok(Json(json!({ "message": "All services started successfully." })))
}

async fn stop(State(state): State<InfraApiState>) -> Result<impl IntoResponse> {
    let missing = state.orchestrator.missing().await;
    if !missing.is_empty() {
        return Err(DaemonError::BadRequest(format!(
            "cannot stop services, missing: {}",
            missing.join(", ")
        )));
    }
    state.orchestrator.stop_all().await?;
    Ok(Json(json!({ "message": "All services stopped successfully." })))
}

async fn delete_services(State(state): State<InfraApiState>) -> Result<impl IntoResponse> {
    let missing = state.orchestrator.missing().await;
    if !missing.is_empty() {
        return Err(DaemonError::BadRequest(format!(
            "cannot delete services, missing: {}",
            missing.join(", ")
        )));
    }
    state.orchestrator.delete_all().await?;
    Ok(Json(json!({ "message": "All services deleted successfully." })))
}

async fn status(State(state): State<InfraApiState>) -> impl IntoResponse {
    let report = state.orchestrator.status_report().await;
    Json(json!({
        "open_search_node": report.get("hive-opensearch-node").cloned().unwrap_or_default(),
        "nats_server": report.get("hive-nats-server").cloned().unwrap_or_default(),
        "log_collector": report.get("hive-log-collector").cloned().unwrap_or_default(),
        "open_search_dashboard": report.get("hive-opensearch-dash").cloned().unwrap_or_default(),
    }))
}

async fn services(State(state): State<InfraApiState>) -> impl IntoResponse {
    let running = state
        .orchestrator
        .status_report()
        .await
        .into_iter()
        .filter(|(_, status)| status == "running")
        .map(|(name, _)| name)
        .collect::<Vec<_>>();
    Json(running)
}
