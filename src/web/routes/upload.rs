//! Upload Routes
//!
//! - POST /api/upload - Run uploaded X-rays through both models

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Html,
    Json,
};
use std::sync::Arc;

use crate::upload::render_results;
use crate::web::dto::UploadRequest;
use crate::web::error::{WebError, WebResult};
use crate::web::state::AppState;

/// POST /api/upload
///
/// Responds with the HTML fragments for the prediction page's output
/// area, one per file. An empty batch yields an empty body.
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> WebResult<Html<String>> {
    let Json(request) = payload.map_err(rejection_error)?;

    let results = state.uploads.handle_upload(request.files.as_deref()).await;

    let failed = results.iter().filter(|r| !r.is_predicted()).count();
    tracing::info!(files = results.len(), failed = failed, "Upload processed");

    Ok(Html(render_results(&results)))
}

/// An oversized body keeps its 413; every other rejection is a bad request
fn rejection_error(rejection: JsonRejection) -> WebError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        WebError::PayloadTooLarge(rejection.body_text())
    } else {
        WebError::Validation(rejection.body_text())
    }
}
