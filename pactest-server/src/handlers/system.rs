use axum::{Json, extract::State};
use pactest_core::api::types::{ApiResponse, Empty, EngineList};

use crate::infra::app_state::AppState;

pub async fn up_handler() -> Json<ApiResponse<Empty>> {
    Json(ApiResponse::ok())
}

/// Configured engines in result order.
pub async fn list_engines_handler(State(state): State<AppState>) -> Json<ApiResponse<EngineList>> {
    Json(ApiResponse::success(EngineList {
        engines: state.orchestrator().registry().as_slice().to_vec(),
    }))
}
