//! # Blog Infrastructure
//!
//! Concrete implementations of the `EntityApi` port defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No HTTP transport, in-memory only
//! - `http` - REST transport via reqwest

pub mod memory;

#[cfg(feature = "http")]
pub mod http;

// Re-exports - In-Memory
pub use memory::InMemoryEntityApi;

// Re-exports - HTTP
#[cfg(feature = "http")]
pub use http::{RestClientConfig, RestCommentApi, RestEntityApi, RestPostApi, RestUserApi};
