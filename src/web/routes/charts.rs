//! Chart Routes
//!
//! - GET /api/charts - Plotly figures of the analytics page

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::web::dto::ChartsResponse;
use crate::web::state::AppState;

/// GET /api/charts
pub async fn get_charts(State(state): State<Arc<AppState>>) -> Json<ChartsResponse> {
    Json(ChartsResponse {
        boneage: state.analytics.boneage_chart().clone(),
        sex: state.analytics.sex_chart().clone(),
    })
}
