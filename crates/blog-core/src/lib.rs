//! # Blog Core
//!
//! The client-side domain layer: entity types, the generic CRUD store that
//! caches one entity type, and the form/detail controllers built on it.
//! Transport is abstracted behind the [`ports::EntityApi`] port.

pub mod detail;
pub mod domain;
pub mod error;
pub mod form;
pub mod pagination;
pub mod ports;
pub mod store;

pub use error::ApiError;
