//! Application state: one store per entity type, sharing a backend.

use std::sync::Arc;

use blog_core::domain::{Comment, Entity, Post, User};
use blog_core::ports::EntityApi;
use blog_core::store::EntityStore;
use blog_infra::InMemoryEntityApi;

use crate::cli::BackendKind;
use crate::config::AppConfig;

/// Stores shared by all commands.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<EntityStore<Post>>,
    pub comments: Arc<EntityStore<Comment>>,
    pub users: Arc<EntityStore<User>>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        match config.backend {
            BackendKind::Http => Self::rest(config),
            BackendKind::Memory => {
                tracing::info!("Using in-memory backend; changes are discarded on exit");
                Ok(Self::memory())
            }
        }
    }

    #[cfg(feature = "http")]
    fn rest(config: &AppConfig) -> anyhow::Result<Self> {
        use blog_infra::RestEntityApi;

        let client = config.rest.build_client()?;
        let base_url = config.rest.base_url.as_str();
        tracing::info!(base_url, "Using REST backend");

        Ok(Self::from_apis(
            Arc::new(RestEntityApi::<Post>::new(client.clone(), base_url)),
            Arc::new(RestEntityApi::<Comment>::new(client.clone(), base_url)),
            Arc::new(RestEntityApi::<User>::new(client, base_url)),
        ))
    }

    #[cfg(not(feature = "http"))]
    fn rest(_config: &AppConfig) -> anyhow::Result<Self> {
        anyhow::bail!("built without the `http` feature; use --backend memory")
    }

    fn memory() -> Self {
        Self::from_apis(
            Arc::new(InMemoryEntityApi::<Post>::new()),
            Arc::new(InMemoryEntityApi::<Comment>::new()),
            Arc::new(InMemoryEntityApi::seeded([
                User::new(1, "admin"),
                User::new(2, "user"),
            ])),
        )
    }

    fn from_apis(
        posts: Arc<dyn EntityApi<Post>>,
        comments: Arc<dyn EntityApi<Comment>>,
        users: Arc<dyn EntityApi<User>>,
    ) -> Self {
        Self {
            posts: store(posts),
            comments: store(comments),
            users: store(users),
        }
    }
}

fn store<E: Entity>(api: Arc<dyn EntityApi<E>>) -> Arc<EntityStore<E>> {
    Arc::new(EntityStore::new(api))
}
