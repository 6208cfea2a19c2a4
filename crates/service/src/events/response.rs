use axum::http::StatusCode;

use super::errors::EventError;

/// Result envelope of every event operation: an optional body plus the status
/// the HTTP boundary should use.
#[derive(Debug, Clone, PartialEq)]
pub struct EventResponse<T> {
    pub body: Option<T>,
    pub status: StatusCode,
}

impl<T> EventResponse<T> {
    pub fn ok(body: T) -> Self { Self { body: Some(body), status: StatusCode::OK } }

    /// 204 that still hands the record back to in-process callers.
    pub fn no_content(body: T) -> Self { Self { body: Some(body), status: StatusCode::NO_CONTENT } }

    pub fn empty(status: StatusCode) -> Self { Self { body: None, status } }
}

impl<T> From<EventError> for EventResponse<T> {
    fn from(err: EventError) -> Self { Self::empty(err.status()) }
}
