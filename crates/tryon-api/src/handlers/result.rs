//! Generated image download.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Response, StatusCode};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Download the generated try-on image as an attachment.
pub async fn get_result(State(state): State<AppState>) -> ApiResult<Response<Body>> {
    let image = state
        .session
        .result()
        .await
        .ok_or_else(|| ApiError::not_found("No generated image"))?;

    let bytes = image
        .bytes()
        .map_err(|e| ApiError::internal(format!("Failed to decode generated image: {}", e)))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, image.media_type.as_str())
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", image.download_filename()),
        )
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}
