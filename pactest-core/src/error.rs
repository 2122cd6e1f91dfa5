use thiserror::Error;

#[derive(Error, Debug)]
pub enum PacError {
    #[error("PAC not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid engine configuration: {0}")]
    InvalidEngine(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PacError>;
