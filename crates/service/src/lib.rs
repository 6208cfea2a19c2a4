//! Service layer for event records.
//! - `events::EventsService` holds the request-to-outcome rules.
//! - Persistence sits behind `events::repository::EventStore`.

pub mod errors;
pub mod events;
#[cfg(test)]
pub mod test_support;
