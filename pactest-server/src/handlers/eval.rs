use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use pactest_core::{
    api::types::{EvalInput, EvalWithPacInput},
    eval::{EvalRequest, EvalResponse},
    pac::Pac,
    validation::{validate_dest_host, validate_pac_content, validate_src_ip},
};
use tracing::info;

use super::check_fields;
use crate::infra::{app_state::AppState, errors::AppResult};

/// Store a PAC and evaluate it in one call
///
/// # Request
///
/// ```json
/// {
///   "content": "function FindProxyForURL(url, host) { return \"PROXY p:8080\"; }",
///   "dest_host": "example.com",
///   "src_ip": "10.0.0.1"
/// }
/// ```
///
/// # Response
///
/// - `200 OK` with an `EvalResponse`, whatever the engines answered
/// - `400 Bad Request` when any field fails validation
pub async fn eval_inline_handler(
    State(state): State<AppState>,
    payload: Result<Json<EvalWithPacInput>, JsonRejection>,
) -> AppResult<Json<EvalResponse>> {
    let Json(input) = payload?;
    check_fields([
        ("content", validate_pac_content(&input.content)),
        ("dest_host", validate_dest_host(&input.dest_host)),
        ("src_ip", validate_src_ip(&input.src_ip).map(|_| ())),
    ])?;

    let pac = Pac::new(input.content);
    state.store().put(pac.clone());
    info!(uid = %pac.uid, "PAC stored for evaluation");

    let request = EvalRequest::new(pac, input.dest_host, input.src_ip);
    Ok(Json(state.orchestrator().evaluate(request).await))
}

/// Evaluate a previously stored PAC
///
/// An unknown uid is a `404` and no engine is called.
pub async fn eval_by_uid_handler(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    payload: Result<Json<EvalInput>, JsonRejection>,
) -> AppResult<Json<EvalResponse>> {
    let pac = state.store().get(&uid)?;
    let Json(input) = payload?;
    check_fields([
        ("dest_host", validate_dest_host(&input.dest_host)),
        ("src_ip", validate_src_ip(&input.src_ip).map(|_| ())),
    ])?;

    let request = EvalRequest::new(pac, input.dest_host, input.src_ip);
    Ok(Json(state.orchestrator().evaluate(request).await))
}
