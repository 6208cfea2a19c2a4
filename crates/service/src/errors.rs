use thiserror::Error;

/// Errors raised by stores and other persistence-facing code.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}
