use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

/// Outcomes other than success for event operations.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("event {0} not found")]
    NotFound(Uuid),
    #[error("event {id} already has {flag} set")]
    InvalidStateTransition { id: Uuid, flag: &'static str },
    #[error("store rejected event: {0}")]
    StoreRejection(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl EventError {
    pub fn status(&self) -> StatusCode {
        match self {
            EventError::NotFound(_) => StatusCode::NOT_FOUND,
            EventError::InvalidStateTransition { .. } | EventError::StoreRejection(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EventError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            EventError::NotFound(_) => 2001,
            EventError::InvalidStateTransition { .. } => 2002,
            EventError::StoreRejection(_) => 2101,
            EventError::StoreUnavailable(_) => 2102,
        }
    }
}
