//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod entity_api;

pub use entity_api::EntityApi;
