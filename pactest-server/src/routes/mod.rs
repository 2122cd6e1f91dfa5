pub mod v1;

use axum::{Router, http::Uri, routing::get};
use pactest_core::api::routes::{PAC_CONTENT, UP};
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    handlers::{pac::pac_content_handler, system::up_handler},
    infra::errors::AppError,
};

/// Create the main API router with all versions
pub fn create_api_router() -> Router<AppState> {
    Router::new().merge(v1::create_v1_router())
}

/// Full application: unversioned routes, the versioned API and tracing.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route(UP, get(up_handler))
        .route(PAC_CONTENT, get(pac_content_handler))
        .merge(create_api_router())
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback_handler(uri: Uri) -> AppError {
    AppError::not_found(format!("No route for {}", uri.path()))
}
