//! REST transport over HTTP.

mod client;
mod config;

pub use client::{RestCommentApi, RestEntityApi, RestPostApi, RestUserApi};
pub use config::RestClientConfig;
