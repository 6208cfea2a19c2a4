use chrono::Utc;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::events::domain::Event;
use crate::events::repository::EventStore;
use models::event::{self, EventFields};

/// SeaORM-backed event store.
pub struct SeaOrmEventStore {
    pub db: DatabaseConnection,
}

impl From<event::Model> for Event {
    fn from(m: event::Model) -> Self {
        Event {
            id: Some(m.id),
            name: m.name,
            description: m.description,
            payload: m.payload,
            notification_sent: m.notification_sent,
            is_deleted: m.is_deleted,
            created_at: Some(m.created_at.with_timezone(&Utc)),
            updated_at: Some(m.updated_at.with_timezone(&Utc)),
        }
    }
}

fn into_rows(rows: Vec<event::Model>) -> Vec<Event> { rows.into_iter().map(Event::from).collect() }

#[async_trait::async_trait]
impl EventStore for SeaOrmEventStore {
    async fn save(&self, e: Event) -> Result<Event, ServiceError> {
        let fields = EventFields {
            name: e.name,
            description: e.description,
            payload: e.payload,
            notification_sent: e.notification_sent,
            is_deleted: e.is_deleted,
        };
        let saved = event::save(&self.db, e.id, fields).await?;
        Ok(saved.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, ServiceError> {
        Ok(event::find(&self.db, id).await?.map(Event::from))
    }

    async fn find_all(&self) -> Result<Vec<Event>, ServiceError> {
        Ok(into_rows(event::list(&self.db, None, None).await?))
    }

    async fn filter_by_notification_sent(&self, notification_sent: bool) -> Result<Vec<Event>, ServiceError> {
        Ok(into_rows(event::list(&self.db, Some(notification_sent), None).await?))
    }

    async fn filter_by_is_deleted(&self, is_deleted: bool) -> Result<Vec<Event>, ServiceError> {
        Ok(into_rows(event::list(&self.db, None, Some(is_deleted)).await?))
    }

    async fn filter_by_notification_sent_and_is_deleted(&self, notification_sent: bool, is_deleted: bool) -> Result<Vec<Event>, ServiceError> {
        Ok(into_rows(event::list(&self.db, Some(notification_sent), Some(is_deleted)).await?))
    }
}
