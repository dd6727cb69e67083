//! Workflow trigger handlers.
//!
//! Analysis and synthesis run in the background: the trigger answers 202
//! with the snapshot in its new step and the client polls `GET /api/workflow`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tryon_models::WorkflowSnapshot;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ToggleItemRequest {
    pub label: String,
}

/// Current workflow snapshot.
pub async fn get_workflow(State(state): State<AppState>) -> Json<WorkflowSnapshot> {
    Json(state.session.snapshot().await)
}

/// Start item analysis of the clothing image.
pub async fn analyze(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<WorkflowSnapshot>)> {
    let request = state.session.begin_analysis().await?;
    let snapshot = state.session.snapshot().await;

    let session = state.session.clone();
    tokio::spawn(async move {
        session.run_analysis(request).await;
    });

    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

/// Toggle one detected item in the selection.
pub async fn toggle_item(
    State(state): State<AppState>,
    Json(request): Json<ToggleItemRequest>,
) -> ApiResult<Json<WorkflowSnapshot>> {
    let snapshot = state.session.toggle_item(&request.label).await?;
    Ok(Json(snapshot))
}

/// Confirm the selection and start generating.
pub async fn confirm(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<WorkflowSnapshot>)> {
    let request = state.session.begin_confirm().await?;
    let snapshot = state.session.snapshot().await;

    let session = state.session.clone();
    tokio::spawn(async move {
        session.run_synthesis(request).await;
    });

    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

/// Generate again with the last confirmed selection.
pub async fn regenerate(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<WorkflowSnapshot>)> {
    let request = state.session.begin_regenerate().await?;
    let snapshot = state.session.snapshot().await;

    let session = state.session.clone();
    tokio::spawn(async move {
        session.run_synthesis(request).await;
    });

    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

/// Leave the selection and return to idle.
pub async fn cancel(State(state): State<AppState>) -> ApiResult<Json<WorkflowSnapshot>> {
    let snapshot = state.session.cancel_selection().await?;
    Ok(Json(snapshot))
}

/// Reset the whole workflow.
pub async fn reset(State(state): State<AppState>) -> Json<WorkflowSnapshot> {
    Json(state.session.reset().await)
}
