use chrono::{DateTime, Utc};
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Body accepted by `POST /events` (and the legacy `POST /post`).
#[derive(ToSchema)]
pub struct EventInputDoc {
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub payload: Option<serde_json::Value>,
    pub notification_sent: Option<bool>,
    pub is_deleted: Option<bool>,
}

#[derive(ToSchema)]
pub struct EventDoc {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub payload: Option<serde_json::Value>,
    pub notification_sent: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::events::add_event,
        crate::routes::events::list_events,
        crate::routes::events::get_event,
        crate::routes::events::mark_notification_sent,
        crate::routes::events::delete_event,
    ),
    components(
        schemas(
            HealthResponse,
            EventInputDoc,
            EventDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "events")
    )
)]
pub struct ApiDoc;
