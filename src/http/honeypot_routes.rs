//! Honeypot API routes (spec §6.1).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::honeypot::error::HoneypotError;
use crate::honeypot::manager::CreateHoneypotRequest;
use crate::honeypot::HoneypotManager;

use super::state::HoneypotApiState;

pub fn router(manager: Arc<HoneypotManager>) -> Router {
    let state = HoneypotApiState { manager };

    Router::new()
        .route("/healthz", get(healthz))
        .route("/types", get(list_types))
        .route("/types/:honeypot_type/config", get(type_config))
        .route("/types/:honeypot_type/auth-details", get(auth_details))
        .route("/", get(list_all))
        .route("/", post(create))
        .route("/type/:honeypot_type", get(list_by_type))
        .route("/status/:honeypot_status", get(list_by_status))
        .route("/name/:honeypot_name", get(get_one))
        .route("/port-check/:port", get(port_check))
        .route("/:honeypot_name/start", post(start))
        .route("/:honeypot_name/stop", post(stop))
        .route("/:honeypot_name/restart", post(restart))
        .route("/:honeypot_name", delete(delete_honeypot))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

async fn healthz(State(state): State<HoneypotApiState>) -> impl IntoResponse {
    let runtime_ok = state.manager.runtime_healthy().await;
    Json(json!({ "status": "ok", "runtime_ok": runtime_ok }))
}

async fn list_types(State(state): State<HoneypotApiState>) -> Json<Vec<String>> {
    Json(state.manager.available_types())
}

async fn type_config(
    State(state): State<HoneypotApiState>,
    Path(honeypot_type): Path<String>,
) -> Result<impl IntoResponse> {
    let policy = state.manager.type_config(&honeypot_type)?;
    Ok(Json(policy))
}

async fn auth_details(
    State(state): State<HoneypotApiState>,
    Path(honeypot_type): Path<String>,
) -> Result<impl IntoResponse> {
    let details = state.manager.auth_details(&honeypot_type)?;
    Ok(Json(details))
}

async fn list_all(State(state): State<HoneypotApiState>) -> Result<impl IntoResponse> {
    Ok(Json(state.manager.list_all().await?))
}

async fn list_by_type(
    State(state): State<HoneypotApiState>,
    Path(honeypot_type): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.manager.list_by_type(&honeypot_type).await?))
}

async fn list_by_status(
    State(state): State<HoneypotApiState>,
    Path(honeypot_status): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.manager.list_by_status(&honeypot_status).await?))
}

async fn get_one(
    State(state): State<HoneypotApiState>,
    Path(honeypot_name): Path<String>,
) -> Result<impl IntoResponse> {
    let hp = state
        .manager
        .inspect(&honeypot_name)
        .await?
        .ok_or_else(|| HoneypotError::NotFound(honeypot_name.clone()))?;
    Ok(Json(hp))
}

async fn create(
    State(state): State<HoneypotApiState>,
    Json(req): Json<CreateHoneypotRequest>,
) -> Result<impl IntoResponse> {
    let hp = state.manager.create(req).await?;
    Ok((StatusCode::CREATED, Json(hp)))
}

async fn start(
    State(state): State<HoneypotApiState>,
    Path(honeypot_name): Path<String>,
) -> Result<impl IntoResponse> {
    let hp = state.manager.start(&honeypot_name).await?;
    Ok(Json(json!({ "message": "Honeypot started successfully", "honeypot": hp })))
}

async fn stop(
    State(state): State<HoneypotApiState>,
    Path(honeypot_name): Path<String>,
) -> Result<impl IntoResponse> {
    let was_stopped = state
        .manager
        .inspect(&honeypot_name)
        .await?
        .map(|hp| hp.honeypot_status == "exited")
        .unwrap_or(false);
    let hp = state.manager.stop(&honeypot_name).await?;
    let message = if was_stopped {
        format!("Honeypot '{}' is already stopped", hp.honeypot_name)
    } else {
        "Honeypot stopped successfully".to_string()
    };
    Ok(Json(json!({ "message": message, "honeypot": hp })))
}

async fn restart(
    State(state): State<HoneypotApiState>,
    Path(honeypot_name): Path<String>,
) -> Result<impl IntoResponse> {
    let hp = state.manager.restart(&honeypot_name).await?;
    Ok(Json(json!({ "message": "Honeypot restarted successfully", "honeypot": hp })))
}

async fn delete_honeypot(
    State(state): State<HoneypotApiState>,
    Path(honeypot_name): Path<String>,
) -> Result<impl IntoResponse> {
    let hp = state.manager.delete(&honeypot_name).await?;
    Ok(Json(json!({ "message": "Honeypot deleted successfully", "honeypot": hp })))
}

async fn port_check(State(state): State<HoneypotApiState>, Path(port): Path<u16>) -> impl IntoResponse {
    let (available, message) = state.manager.check_port(port).await;
    Json(json!({ "available": available, "message": message }))
}
