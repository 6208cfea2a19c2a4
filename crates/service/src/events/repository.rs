use async_trait::async_trait;
use uuid::Uuid;

use super::domain::Event;
use crate::errors::ServiceError;

/// Persistence collaborator for event records.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert a new record (assigning its id) or overwrite an existing one.
    async fn save(&self, event: Event) -> Result<Event, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<Event>, ServiceError>;
    async fn filter_by_notification_sent(&self, notification_sent: bool) -> Result<Vec<Event>, ServiceError>;
    async fn filter_by_is_deleted(&self, is_deleted: bool) -> Result<Vec<Event>, ServiceError>;
    async fn filter_by_notification_sent_and_is_deleted(&self, notification_sent: bool, is_deleted: bool) -> Result<Vec<Event>, ServiceError>;
}

/// In-memory store for tests and doc examples. Counts calls per operation and
/// can be told to fail every save, or every lookup and list.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;

    use crate::events::domain::EventFilters;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum StoreOp {
        Save,
        FindById,
        FindAll,
        FilterByNotificationSent,
        FilterByIsDeleted,
        FilterByNotificationSentAndIsDeleted,
    }

    #[derive(Default)]
    pub struct InMemoryEventStore {
        events: Mutex<Vec<Event>>, // insertion order
        calls: Mutex<HashMap<StoreOp, usize>>,
        fail_saves: AtomicBool,
        fail_reads: AtomicBool,
    }

    fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    impl InMemoryEventStore {
        /// Seed with records; missing ids are generated.
        pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
            let store = Self::default();
            {
                let mut guard = lock(&store.events);
                for mut e in events {
                    e.id = e.id.or_else(|| Some(Uuid::new_v4()));
                    guard.push(e);
                }
            }
            store
        }

        pub fn set_fail_saves(&self, fail: bool) { self.fail_saves.store(fail, Ordering::SeqCst); }

        /// `find_by_id` and the four list queries error while set.
        pub fn set_fail_reads(&self, fail: bool) { self.fail_reads.store(fail, Ordering::SeqCst); }

        pub fn calls(&self, op: StoreOp) -> usize { lock(&self.calls).get(&op).copied().unwrap_or(0) }

        /// Total calls across every operation.
        pub fn total_calls(&self) -> usize { lock(&self.calls).values().sum() }

        pub fn snapshot(&self) -> Vec<Event> { lock(&self.events).clone() }

        fn record(&self, op: StoreOp) { *lock(&self.calls).entry(op).or_insert(0) += 1; }

        fn check_reads(&self) -> Result<(), ServiceError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("read failed in in-memory store".into()));
            }
            Ok(())
        }

        fn filtered(&self, filters: EventFilters) -> Result<Vec<Event>, ServiceError> {
            self.check_reads()?;
            Ok(lock(&self.events).iter().filter(|e| filters.matches(e)).cloned().collect())
        }
    }

    #[async_trait]
    impl EventStore for InMemoryEventStore {
        async fn save(&self, mut event: Event) -> Result<Event, ServiceError> {
            self.record(StoreOp::Save);
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("save rejected by in-memory store".into()));
            }
            let now = Utc::now();
            let mut events = lock(&self.events);
            let existing = event.id.and_then(|id| events.iter().position(|e| e.id == Some(id)));
            match existing {
                Some(idx) => {
                    event.created_at = events[idx].created_at;
                    event.updated_at = Some(now);
                    events[idx] = event.clone();
                }
                None => {
                    event.id = event.id.or_else(|| Some(Uuid::new_v4()));
                    event.created_at = Some(now);
                    event.updated_at = Some(now);
                    events.push(event.clone());
                }
            }
            Ok(event)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, ServiceError> {
            self.record(StoreOp::FindById);
            self.check_reads()?;
            Ok(lock(&self.events).iter().find(|e| e.id == Some(id)).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Event>, ServiceError> {
            self.record(StoreOp::FindAll);
            self.filtered(EventFilters::default())
        }

        async fn filter_by_notification_sent(&self, notification_sent: bool) -> Result<Vec<Event>, ServiceError> {
            self.record(StoreOp::FilterByNotificationSent);
            self.filtered(EventFilters { notification_sent: Some(notification_sent), is_deleted: None })
        }

        async fn filter_by_is_deleted(&self, is_deleted: bool) -> Result<Vec<Event>, ServiceError> {
            self.record(StoreOp::FilterByIsDeleted);
            self.filtered(EventFilters { notification_sent: None, is_deleted: Some(is_deleted) })
        }

        async fn filter_by_notification_sent_and_is_deleted(&self, notification_sent: bool, is_deleted: bool) -> Result<Vec<Event>, ServiceError> {
            self.record(StoreOp::FilterByNotificationSentAndIsDeleted);
            self.filtered(EventFilters { notification_sent: Some(notification_sent), is_deleted: Some(is_deleted) })
        }
    }

}
