/// Versioned and unversioned route paths
pub mod routes;
/// Request and response bodies of the public API
pub mod types;

pub use routes::v1;
pub use types::{ApiResponse, CreatePacRequest, EvalInput, EvalWithPacInput};
