use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
};
use pactest_core::{
    api::types::{ApiResponse, CreatePacRequest, PacDetails, PacList},
    pac::{PAC_MIME_TYPE, Pac},
    validation::validate_pac_content,
};
use tracing::info;

use super::check_fields;
use crate::infra::{app_state::AppState, errors::AppResult};

/// List stored PACs, oldest first, without their content
pub async fn list_pacs_handler(State(state): State<AppState>) -> Json<ApiResponse<PacList>> {
    Json(ApiResponse::success(PacList {
        pacs: state.store().list(),
    }))
}

/// Get a stored PAC by uid
///
/// # Response
///
/// - `200 OK` with `{"status": "success", "pac": {...}}`
/// - `404 Not Found` when the uid is unknown or was evicted
pub async fn get_pac_handler(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> AppResult<Json<ApiResponse<PacDetails>>> {
    let pac = state.store().get(&uid)?;
    Ok(Json(ApiResponse::success(PacDetails { pac })))
}

/// Serve the raw script so engines (and browsers) can fetch it by URL.
pub async fn pac_content_handler(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> AppResult<impl IntoResponse> {
    let pac = state.store().get(&uid)?;
    Ok(([(header::CONTENT_TYPE, PAC_MIME_TYPE)], pac.content))
}

/// Store a new PAC
///
/// # Request
///
/// ```json
/// { "content": "function FindProxyForURL(url, host) { return \"DIRECT\"; }" }
/// ```
///
/// # Response
///
/// - `200 OK` with the stored PAC, including its freshly generated uid
/// - `400 Bad Request` when the body is malformed or `content` is empty
pub async fn create_pac_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreatePacRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<PacDetails>>> {
    let Json(request) = payload?;
    check_fields([("content", validate_pac_content(&request.content))])?;

    let pac = Pac::new(request.content);
    state.store().put(pac.clone());
    info!(uid = %pac.uid, bytes = pac.content.len(), "PAC stored");

    Ok(Json(ApiResponse::success(PacDetails { pac })))
}
