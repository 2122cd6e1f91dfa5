use axum::{
    Router,
    routing::{get, post},
};
use pactest_core::api::v1;

use crate::{
    AppState,
    handlers::{
        eval::{eval_by_uid_handler, eval_inline_handler},
        pac::{create_pac_handler, get_pac_handler, list_pacs_handler},
        system::list_engines_handler,
    },
};

/// Create all v1 API routes
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route(
            v1::pac::COLLECTION,
            get(list_pacs_handler).post(create_pac_handler),
        )
        .route(v1::pac::ITEM, get(get_pac_handler))
        .route(v1::eval::INLINE, post(eval_inline_handler))
        .route(v1::eval::BY_UID, post(eval_by_uid_handler))
        .route(v1::engines::COLLECTION, get(list_engines_handler))
}
