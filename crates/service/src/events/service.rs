use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::domain::{Event, EventFilters};
use super::errors::EventError;
use super::repository::EventStore;
use super::response::EventResponse;

/// Application service holding the request-to-outcome rules for events.
///
/// Every operation is a single read-then-write against the store and always
/// returns an [`EventResponse`]; store failures never escape as errors.
pub struct EventsService<R: EventStore + ?Sized> {
    repo: Arc<R>,
}

impl<R: EventStore + ?Sized> EventsService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Persist a new event. The store assigns identity and is the only judge
    /// of whether the candidate is acceptable.
    ///
    /// # Examples
    /// ```
    /// use service::events::{Event, EventsService, repository::mock::InMemoryEventStore};
    /// use std::sync::Arc;
    /// let svc = EventsService::new(Arc::new(InMemoryEventStore::default()));
    /// let res = tokio_test::block_on(svc.add_event(Event::named("release party")));
    /// assert_eq!(res.status.as_u16(), 200);
    /// assert!(res.body.unwrap().id.is_some());
    /// ```
    #[instrument(skip(self, candidate), fields(name = %candidate.name))]
    pub async fn add_event(&self, mut candidate: Event) -> EventResponse<Event> {
        candidate.id = None;
        candidate.created_at = None;
        candidate.updated_at = None;
        match self.repo.save(candidate).await {
            Ok(saved) => {
                info!(id = ?saved.id, "event_created");
                EventResponse::ok(saved)
            }
            Err(e) => {
                warn!(err = %e, "event_rejected_by_store");
                EventError::StoreRejection(e.to_string()).into()
            }
        }
    }

    /// Mark the notification for an event as sent. Only a `false -> true`
    /// transition is allowed.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn update_event(&self, id: Uuid) -> EventResponse<Event> {
        match self.mark_notification_sent(id).await {
            Ok(event) => {
                info!("event_notification_marked");
                EventResponse::ok(event)
            }
            Err(e) => Self::reject(e),
        }
    }

    /// Soft-delete an event. The record is kept and returned alongside a 204.
    ///
    /// # Examples
    /// ```
    /// use service::events::{Event, EventsService, repository::mock::InMemoryEventStore};
    /// use std::sync::Arc;
    /// let store = Arc::new(InMemoryEventStore::with_events([Event::named("meetup")]));
    /// let id = store.snapshot()[0].id.unwrap();
    /// let svc = EventsService::new(store.clone());
    /// let res = tokio_test::block_on(svc.delete_event(id));
    /// assert_eq!(res.status.as_u16(), 204);
    /// assert!(res.body.unwrap().is_deleted);
    /// assert_eq!(store.snapshot().len(), 1);
    /// ```
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_event(&self, id: Uuid) -> EventResponse<Event> {
        match self.soft_delete(id).await {
            Ok(event) => {
                info!("event_soft_deleted");
                EventResponse::no_content(event)
            }
            Err(e) => Self::reject(e),
        }
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_event_by_uuid(&self, id: Uuid) -> EventResponse<Event> {
        match self.load(id).await {
            Ok(event) => EventResponse::ok(event),
            Err(e) => Self::reject(e),
        }
    }

    /// List events, dispatching to exactly one store query depending on which
    /// filters are set.
    #[instrument(skip(self))]
    pub async fn get_all_events(&self, filters: EventFilters) -> EventResponse<Vec<Event>> {
        let res = match (filters.notification_sent, filters.is_deleted) {
            (None, None) => self.repo.find_all().await,
            (Some(ns), None) => self.repo.filter_by_notification_sent(ns).await,
            (None, Some(del)) => self.repo.filter_by_is_deleted(del).await,
            (Some(ns), Some(del)) => self.repo.filter_by_notification_sent_and_is_deleted(ns, del).await,
        };
        match res {
            Ok(events) => {
                debug!(count = events.len(), "events_listed");
                EventResponse::ok(events)
            }
            Err(e) => Self::reject(EventError::StoreUnavailable(e.to_string())),
        }
    }

    async fn load(&self, id: Uuid) -> Result<Event, EventError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| EventError::StoreUnavailable(e.to_string()))?
            .ok_or(EventError::NotFound(id))
    }

    async fn mark_notification_sent(&self, id: Uuid) -> Result<Event, EventError> {
        let mut event = self.load(id).await?;
        if event.notification_sent {
            return Err(EventError::InvalidStateTransition { id, flag: "notification_sent" });
        }
        event.notification_sent = true;
        self.persist(event).await
    }

    async fn soft_delete(&self, id: Uuid) -> Result<Event, EventError> {
        let mut event = self.load(id).await?;
        if event.is_deleted {
            return Err(EventError::InvalidStateTransition { id, flag: "is_deleted" });
        }
        event.is_deleted = true;
        self.persist(event).await
    }

    async fn persist(&self, event: Event) -> Result<Event, EventError> {
        self.repo.save(event).await.map_err(|e| EventError::StoreUnavailable(e.to_string()))
    }

    fn reject<T>(e: EventError) -> EventResponse<T> {
        match &e {
            EventError::StoreUnavailable(_) => error!(err = %e, code = e.code(), "event_store_failed"),
            _ => debug!(err = %e, code = e.code(), "event_request_refused"),
        }
        e.into()
    }
}
