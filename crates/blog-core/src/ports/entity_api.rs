use async_trait::async_trait;

use crate::domain::{Entity, EntityId};
use crate::error::ApiError;
use crate::pagination::{Page, PageRequest};

/// The conventional collection-resource API of one entity type.
///
/// | operation | request |
/// |---|---|
/// | `list` | `GET /api/<entities>?page=&size=&sort=` |
/// | `search` | `GET /api/_search/<entities>?query=&page=&size=&sort=` |
/// | `get` | `GET /api/<entities>/{id}` |
/// | `create` | `POST /api/<entities>` |
/// | `update` | `PUT /api/<entities>` |
/// | `delete` | `DELETE /api/<entities>/{id}` |
#[async_trait]
pub trait EntityApi<E: Entity>: Send + Sync {
    /// Fetch one page of the collection.
    async fn list(&self, page: &PageRequest) -> Result<Page<E>, ApiError>;

    /// Fetch one page of the entities matching `query`.
    async fn search(&self, query: &str, page: &PageRequest) -> Result<Page<E>, ApiError>;

    /// Fetch a single entity.
    async fn get(&self, id: EntityId) -> Result<E, ApiError>;

    /// Persist a new entity. The returned entity carries the assigned id.
    async fn create(&self, entity: &E) -> Result<E, ApiError>;

    /// Replace the persisted entity with the same id.
    async fn update(&self, entity: &E) -> Result<E, ApiError>;

    /// Delete an entity by its id.
    async fn delete(&self, id: EntityId) -> Result<(), ApiError>;
}
