use axum::{
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use service::events::{Event, EventFilters, EventResponse};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{errors::JsonApiError, state::ServerState};

/// `?notification_sent=&is_deleted=`; other keys are ignored.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Only events whose notification flag equals this value
    pub notification_sent: Option<bool>,
    /// Only events whose soft-delete flag equals this value
    pub is_deleted: Option<bool>,
}

impl From<ListQuery> for EventFilters {
    fn from(q: ListQuery) -> Self {
        EventFilters { notification_sent: q.notification_sent, is_deleted: q.is_deleted }
    }
}

/// Empty outcomes go out as the bare status; 204 never carries bytes.
fn respond<T: Serialize>(res: EventResponse<T>) -> Response {
    match res.body {
        Some(body) if res.status != StatusCode::NO_CONTENT => (res.status, Json(body)).into_response(),
        _ => res.status.into_response(),
    }
}

fn event_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, JsonApiError> {
    path.map(|Path(id)| id)
        .map_err(|e| JsonApiError::bad_request(e.body_text()))
}

/// Well-formed JSON whose fields have the wrong types is refused like any
/// other unacceptable candidate: bare 422. Syntax and content-type problems
/// keep axum's status with a JSON error body.
fn event_body(body: Result<Json<Event>, JsonRejection>) -> Result<Event, Response> {
    match body {
        Ok(Json(event)) => Ok(event),
        Err(JsonRejection::JsonDataError(e)) => {
            debug!(err = %e.body_text(), "event_body_unprocessable");
            Err(StatusCode::UNPROCESSABLE_ENTITY.into_response())
        }
        Err(e) => {
            let status = e.status();
            let label = status.canonical_reason().unwrap_or("Bad Request");
            Err(JsonApiError::new(status, label, Some(e.body_text())).into_response())
        }
    }
}

#[utoipa::path(
    post, path = "/events", tag = "events",
    request_body = crate::openapi::EventInputDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::EventDoc),
        (status = 400, description = "Body is not valid JSON"),
        (status = 422, description = "Rejected by the store or wrongly typed fields")
    )
)]
pub async fn add_event(State(state): State<ServerState>, body: Result<Json<Event>, JsonRejection>) -> Response {
    let candidate = match event_body(body) {
        Ok(candidate) => candidate,
        Err(rejected) => return rejected,
    };
    info!(name = %candidate.name, "event_create_request");
    respond(state.events.add_event(candidate).await)
}

#[utoipa::path(
    get, path = "/events", tag = "events",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::EventDoc]),
        (status = 400, description = "Filter is not a boolean literal")
    )
)]
pub async fn list_events(
    State(state): State<ServerState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, JsonApiError> {
    let Query(q) = query.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    Ok(respond(state.events.get_all_events(q.into()).await))
}

#[utoipa::path(
    get, path = "/events/{id}", tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::EventDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_event(
    State(state): State<ServerState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, JsonApiError> {
    let id = event_id(path)?;
    Ok(respond(state.events.get_event_by_uuid(id).await))
}

#[utoipa::path(
    put, path = "/events/{id}/notification", tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Notification marked as sent", body = crate::openapi::EventDoc),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Notification already sent")
    )
)]
pub async fn mark_notification_sent(
    State(state): State<ServerState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, JsonApiError> {
    let id = event_id(path)?;
    Ok(respond(state.events.update_event(id).await))
}

#[utoipa::path(
    delete, path = "/events/{id}", tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Soft-deleted"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Already deleted")
    )
)]
pub async fn delete_event(
    State(state): State<ServerState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, JsonApiError> {
    let id = event_id(path)?;
    Ok(respond(state.events.delete_event(id).await))
}
