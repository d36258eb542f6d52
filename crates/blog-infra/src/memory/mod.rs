//! In-memory entity API - used offline, by tests, and as the stub backend's storage.

mod entity_api;

pub use entity_api::InMemoryEntityApi;
