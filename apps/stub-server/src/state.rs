//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::domain::{Comment, Post, User};
use blog_infra::InMemoryEntityApi;

/// Shared application state: one in-memory collection per entity type.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<InMemoryEntityApi<Post>>,
    pub comments: Arc<InMemoryEntityApi<Comment>>,
    pub users: Arc<InMemoryEntityApi<User>>,
}

impl AppState {
    /// Empty posts and comments, with the default accounts available as
    /// post creators.
    pub fn new() -> Self {
        let users = InMemoryEntityApi::seeded([User::new(1, "admin"), User::new(2, "user")]);

        tracing::info!("Application state initialized");

        Self {
            posts: Arc::new(InMemoryEntityApi::new()),
            comments: Arc::new(InMemoryEntityApi::new()),
            users: Arc::new(users),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
