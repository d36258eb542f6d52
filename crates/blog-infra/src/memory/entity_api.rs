//! In-memory implementation of the collection API.

use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use blog_core::ApiError;
use blog_core::domain::{Entity, EntityId};
use blog_core::pagination::{Links, Page, PageRequest};
use blog_core::ports::EntityApi;

/// Entity collection held in a `BTreeMap` behind an async RwLock.
///
/// Behaves like the REST backend: ids are assigned on create, creating an
/// entity that already has an id or updating one without an id is a bad
/// request, and unknown ids are not found.
/// Note: Data is lost on process restart.
pub struct InMemoryEntityApi<E: Entity> {
    entities: RwLock<BTreeMap<EntityId, E>>,
    next_id: AtomicI64,
}

impl<E: Entity> InMemoryEntityApi<E> {
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Start with `entities` already persisted. Entities without an id get
    /// one assigned.
    pub fn seeded(entities: impl IntoIterator<Item = E>) -> Self {
        let mut map = BTreeMap::new();
        let mut pending = Vec::new();
        for entity in entities {
            match entity.id() {
                Some(id) => {
                    map.insert(id, entity);
                }
                None => pending.push(entity),
            }
        }

        let mut next_id = map.keys().next_back().map_or(1, |id| id + 1);
        for mut entity in pending {
            entity.set_id(Some(next_id));
            map.insert(next_id, entity);
            next_id += 1;
        }

        Self {
            entities: RwLock::new(map),
            next_id: AtomicI64::new(next_id),
        }
    }

    pub async fn len(&self) -> usize {
        self.entities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entities.read().await.is_empty()
    }

    fn paginate(mut matching: Vec<E>, request: &PageRequest) -> Page<E> {
        if let Some(sort) = &request.sort {
            sort_by_expression(&mut matching, sort);
        }

        let total = matching.len() as u64;
        let size = request.size.max(1);
        let items = matching
            .into_iter()
            .skip(request.page as usize * size as usize)
            .take(size as usize)
            .collect();

        Page::new(items, total, Links::for_page(request.page, size, total))
    }
}

impl<E: Entity> Default for InMemoryEntityApi<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> EntityApi<E> for InMemoryEntityApi<E> {
    async fn list(&self, page: &PageRequest) -> Result<Page<E>, ApiError> {
        let entities = self.entities.read().await;
        Ok(Self::paginate(entities.values().cloned().collect(), page))
    }

    async fn search(&self, query: &str, page: &PageRequest) -> Result<Page<E>, ApiError> {
        let entities = self.entities.read().await;
        let matching = entities
            .values()
            .filter(|entity| matches_query(*entity, query))
            .cloned()
            .collect();
        Ok(Self::paginate(matching, page))
    }

    async fn get(&self, id: EntityId) -> Result<E, ApiError> {
        let entities = self.entities.read().await;
        entities
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(E::NAME, id))
    }

    async fn create(&self, entity: &E) -> Result<E, ApiError> {
        if entity.id().is_some() {
            return Err(ApiError::bad_request(format!(
                "A new {} cannot already have an ID",
                E::NAME
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut saved = entity.clone().clean();
        saved.set_id(Some(id));

        let mut entities = self.entities.write().await;
        entities.insert(id, saved.clone());
        tracing::debug!(entity = E::NAME, id, "Entity created");

        Ok(saved)
    }

    async fn update(&self, entity: &E) -> Result<E, ApiError> {
        let id = entity
            .id()
            .ok_or_else(|| ApiError::bad_request(format!("Invalid {} id", E::NAME)))?;

        let mut entities = self.entities.write().await;
        let slot = entities
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found(E::NAME, id))?;
        *slot = entity.clone().clean();
        tracing::debug!(entity = E::NAME, id, "Entity updated");

        Ok(slot.clone())
    }

    async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        let mut entities = self.entities.write().await;
        if entities.remove(&id).is_none() {
            return Err(ApiError::not_found(E::NAME, id));
        }
        tracing::debug!(entity = E::NAME, id, "Entity deleted");

        Ok(())
    }
}

/// Query semantics: blank or `*` matches everything, `field:value` matches
/// one top-level field exactly, anything else is a case-insensitive
/// substring search over every value of the entity.
fn matches_query<E: Entity>(entity: &E, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() || query == "*" {
        return true;
    }
    let Ok(json) = serde_json::to_value(entity) else {
        return false;
    };

    match query.split_once(':') {
        Some((field, expected)) => json
            .get(field)
            .is_some_and(|value| leaf_text(value).eq_ignore_ascii_case(expected)),
        None => {
            let needle = query.to_lowercase();
            let mut leaves = Vec::new();
            collect_leaves(&json, &mut leaves);
            leaves.iter().any(|leaf| leaf.to_lowercase().contains(&needle))
        }
    }
}

fn leaf_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn collect_leaves(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => map.values().for_each(|v| collect_leaves(v, out)),
        Value::Array(items) => items.iter().for_each(|v| collect_leaves(v, out)),
        Value::Null => {}
        leaf => out.push(leaf_text(leaf)),
    }
}

/// Sort by a `field,asc|desc` expression. Missing fields sort first.
fn sort_by_expression<E: Entity>(entities: &mut [E], sort: &str) {
    let (field, direction) = sort.split_once(',').unwrap_or((sort, "asc"));
    let descending = direction.trim().eq_ignore_ascii_case("desc");
    let field = field.trim();

    let key = |entity: &E| {
        serde_json::to_value(entity)
            .ok()
            .and_then(|json| json.get(field).cloned())
            .unwrap_or(Value::Null)
    };

    entities.sort_by(|a, b| {
        let ordering = compare_values(&key(a), &key(b));
        if descending { ordering.reverse() } else { ordering }
    });
}

fn compare_values(a: &Value, b: &Value) -> CmpOrdering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(CmpOrdering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Null, Value::Null) => CmpOrdering::Equal,
        (Value::Null, _) => CmpOrdering::Less,
        (_, Value::Null) => CmpOrdering::Greater,
        _ => CmpOrdering::Equal,
    }
}
