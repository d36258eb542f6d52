//! # Blog Shared
//!
//! Wire-level types shared by the REST client and the stub backend.

pub mod api;
pub mod response;

pub use response::ErrorResponse;
