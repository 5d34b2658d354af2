//! Page Routes
//!
//! Every path not claimed by another route renders the dashboard page for
//! that path.
//!
//! - GET /, /page-1 - Project information
//! - GET /page-2 - Dataset charts
//! - GET /page-3 - X-ray upload
//! - anything else - 404 view

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::Html,
};
use std::sync::Arc;

use crate::web::state::AppState;

/// Render the page for the request path
pub async fn render_page(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> (StatusCode, Html<String>) {
    let page = state.layout.render(uri.path());

    let status = if page.is_not_found() {
        tracing::debug!(path = %uri.path(), "Unrecognized path");
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    (status, Html(page.html))
}
