use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An event record as seen by the service.
///
/// Only `id`, `notification_sent` and `is_deleted` carry meaning here; the
/// remaining fields pass through untouched. Every field has a default so the
/// store, not the request parser, decides whether a candidate is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Assigned by the store on first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
    #[serde(default)]
    pub notification_sent: bool,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }
}

/// Which flag filters a listing applies. Unset fields are not filtered on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilters {
    pub notification_sent: Option<bool>,
    pub is_deleted: Option<bool>,
}

impl EventFilters {
    pub fn matches(&self, event: &Event) -> bool {
        self.notification_sent.map_or(true, |ns| event.notification_sent == ns)
            && self.is_deleted.map_or(true, |del| event.is_deleted == del)
    }
}
