//! Read-only detail view of one entity.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{Entity, EntityId};
use crate::error::ApiError;
use crate::store::EntityStore;

/// One labelled value of a detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

impl DetailField {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }

    /// ISO calendar date, blank when absent.
    pub fn date(label: &'static str, date: Option<NaiveDate>) -> Self {
        Self::new(label, date.map(|d| d.to_string()).unwrap_or_default())
    }
}

/// Labelled projection of an entity for display.
pub trait DetailView: Entity {
    /// Heading shown before the id, e.g. `Comment`.
    const HEADING: &'static str;

    fn detail_fields(&self) -> Vec<DetailField>;
}

pub struct EntityDetail<E: DetailView> {
    store: Arc<EntityStore<E>>,
    id: EntityId,
}

impl<E: DetailView> EntityDetail<E> {
    pub fn new(store: Arc<EntityStore<E>>, id: EntityId) -> Self {
        Self { store, id }
    }

    /// Load the entity into the store's current slot.
    pub async fn mount(&self) -> Result<E, ApiError> {
        self.store.fetch_one(self.id).await
    }

    /// `Comment [3]`
    pub fn title(&self) -> String {
        let id = self
            .store
            .state()
            .entity
            .id()
            .map(|id| id.to_string())
            .unwrap_or_default();
        format!("{} [{}]", E::HEADING, id)
    }

    pub fn fields(&self) -> Vec<DetailField> {
        self.store.state().entity.detail_fields()
    }

    pub fn back_route(&self) -> String {
        E::list_route()
    }

    pub fn edit_route(&self) -> String {
        format!("{}/{}/edit", E::list_route(), self.id)
    }
}
