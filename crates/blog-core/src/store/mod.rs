//! Generic CRUD store - one instance caches one entity type.
//!
//! Every network-backed operation follows the same lifecycle: a
//! `Requested` event is applied, the [`EntityApi`] call runs, and the
//! outcome is applied as a success or `Failed` event. State is published
//! through a `watch` channel so views observe transitions instead of
//! chaining off the call.
//!
//! Overlapping requests are neither deduplicated nor fenced: whichever
//! response resolves last wins.

mod event;
mod state;

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{Entity, EntityId};
use crate::error::ApiError;
use crate::pagination::{Page, PageRequest};
use crate::ports::EntityApi;

pub use event::{Operation, StoreEvent};
pub use state::StoreState;

/// State container and operations for one entity type.
pub struct EntityStore<E: Entity> {
    api: Arc<dyn EntityApi<E>>,
    state: watch::Sender<StoreState<E>>,
}

impl<E: Entity> EntityStore<E> {
    pub fn new(api: Arc<dyn EntityApi<E>>) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self { api, state }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> StoreState<E> {
        self.state.borrow().clone()
    }

    /// Receiver notified after every transition.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<E>> {
        self.state.subscribe()
    }

    /// Apply one event atomically.
    pub fn dispatch(&self, event: StoreEvent<E>) {
        tracing::debug!(
            entity = E::NAME,
            event = event.name(),
            operation = event.operation().map(Operation::as_str),
            "Store transition"
        );
        self.state.send_modify(|state| state.apply(event));
    }

    pub async fn fetch_list(&self, page: PageRequest) -> Result<Page<E>, ApiError> {
        self.dispatch(StoreEvent::Requested(Operation::FetchList));
        let result = self.api.list(&page).await;
        self.settle(Operation::FetchList, result, |page| StoreEvent::ListLoaded {
            operation: Operation::FetchList,
            page: page.clone(),
        })
    }

    pub async fn search(&self, query: &str, page: PageRequest) -> Result<Page<E>, ApiError> {
        self.dispatch(StoreEvent::Requested(Operation::Search));
        let result = self.api.search(query, &page).await;
        self.settle(Operation::Search, result, |page| StoreEvent::ListLoaded {
            operation: Operation::Search,
            page: page.clone(),
        })
    }

    pub async fn fetch_one(&self, id: EntityId) -> Result<E, ApiError> {
        self.dispatch(StoreEvent::Requested(Operation::FetchOne));
        let result = self.api.get(id).await;
        self.settle(Operation::FetchOne, result, |entity| {
            StoreEvent::EntityLoaded(entity.clone())
        })
    }

    /// Persist a new entity. The entity must not carry an id yet.
    ///
    /// Not safe to retry: a failure after the server committed the insert
    /// would create a duplicate.
    pub async fn create(&self, entity: E) -> Result<E, ApiError> {
        self.dispatch(StoreEvent::Requested(Operation::Create));
        let result = match entity.id() {
            Some(id) => Err(ApiError::Invalid(format!(
                "a new {} cannot already have an id ({id})",
                E::NAME
            ))),
            None => self.api.create(&entity.clean()).await,
        };
        self.settle(Operation::Create, result, |saved| StoreEvent::Saved {
            operation: Operation::Create,
            entity: saved.clone(),
        })
    }

    /// Replace a persisted entity. The entity must carry its id.
    pub async fn update(&self, entity: E) -> Result<E, ApiError> {
        self.dispatch(StoreEvent::Requested(Operation::Update));
        let result = match entity.id() {
            Some(_) => self.api.update(&entity.clean()).await,
            None => Err(ApiError::Invalid(format!("{} id is required for update", E::NAME))),
        };
        self.settle(Operation::Update, result, |saved| StoreEvent::Saved {
            operation: Operation::Update,
            entity: saved.clone(),
        })
    }

    pub async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        self.dispatch(StoreEvent::Requested(Operation::Delete));
        let result = self.api.delete(id).await;
        self.settle(Operation::Delete, result, |_| StoreEvent::Deleted)
    }

    /// Return the slice to its initial state.
    pub fn reset(&self) {
        self.dispatch(StoreEvent::Reset);
    }

    fn settle<T>(
        &self,
        operation: Operation,
        result: Result<T, ApiError>,
        on_success: impl FnOnce(&T) -> StoreEvent<E>,
    ) -> Result<T, ApiError> {
        match result {
            Ok(value) => {
                self.dispatch(on_success(&value));
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(
                    entity = E::NAME,
                    operation = operation.as_str(),
                    error = %err,
                    "Request failed"
                );
                self.dispatch(StoreEvent::Failed {
                    operation,
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }
}
