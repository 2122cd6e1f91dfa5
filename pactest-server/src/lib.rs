//! # PAC Test Server
//!
//! HTTP front end for the PAC test core. It accepts PAC scripts, keeps the
//! most recent ones in a bounded in-memory store, serves them back to the
//! evaluation engines and asks every configured engine what it makes of a
//! script for a given destination host and source IP.
//!
//! ## Endpoints
//!
//! - `GET /up`: liveness
//! - `GET|POST /api/v1/pac`, `GET /api/v1/pac/{uid}`: PAC store
//! - `GET /pac/{uid}`: raw script, served with the PAC MIME type
//! - `POST /api/v1/eval`, `POST /api/v1/eval/{uid}`: evaluation fan-out
//! - `GET /api/v1/engines`: configured engines

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use routes::create_app;
