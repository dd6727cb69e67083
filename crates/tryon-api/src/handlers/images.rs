//! Image acquisition and preview handlers.

use axum::body::{Body, Bytes};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, Response, StatusCode};
use axum::Json;
use serde::Deserialize;
use tryon_models::{extension_for_media_type, ImageFile, ImageRole, ImageSource, WorkflowSnapshot};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Header carrying the original file name of an upload.
pub const FILE_NAME_HEADER: &str = "X-File-Name";

#[derive(Debug, Deserialize)]
pub struct SelectImageQuery {
    /// How the image was acquired (file, drop, camera)
    #[serde(default)]
    pub source: ImageSource,
}

fn parse_role(role: &str) -> ApiResult<ImageRole> {
    role.parse().map_err(ApiError::bad_request)
}

/// Replace the person or clothing image with the request body.
pub async fn select_image(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Query(query): Query<SelectImageQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WorkflowSnapshot>> {
    let role = parse_role(&role)?;

    let media_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("Content-Type header is required"))?
        .to_string();

    if body.is_empty() {
        return Err(ApiError::bad_request("Image body is empty"));
    }

    let name = headers
        .get(FILE_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}.{}", role, extension_for_media_type(&media_type)));

    let file = ImageFile::new(name, media_type, body.to_vec());
    let snapshot = state.session.select_image(role, query.source, Some(file)).await?;
    Ok(Json(snapshot))
}

/// Clear the person or clothing image.
pub async fn clear_image(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> ApiResult<Json<WorkflowSnapshot>> {
    let role = parse_role(&role)?;
    let snapshot = state.session.select_image(role, ImageSource::File, None).await?;
    Ok(Json(snapshot))
}

/// Serve the bytes behind a live preview URL.
pub async fn get_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response<Body>> {
    let file = state
        .previews
        .get_by_id(&id)
        .ok_or_else(|| ApiError::not_found("Preview not found"))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.media_type())
        .header(header::CONTENT_LENGTH, file.len())
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(file.bytes().to_vec()))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}
