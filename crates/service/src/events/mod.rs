//! Event records: domain (types), repository (store trait), service (rules).

pub mod domain;
pub mod errors;
pub mod repo;
pub mod repository;
pub mod response;
pub mod service;

pub use domain::{Event, EventFilters};
pub use errors::EventError;
pub use repository::EventStore;
pub use response::EventResponse;
pub use service::EventsService;
