//! Create/edit form controller.
//!
//! A form is bound to the store of the edited entity and to the store of the
//! related entity offered in its selection control. Submitted values are raw
//! strings keyed by field path (`title`, `creationDate`, `post.id`, ...) and
//! are merged onto the current entity before dispatch.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::watch;

use crate::domain::{Entity, EntityId};
use crate::error::ApiError;
use crate::pagination::PageRequest;
use crate::store::{EntityStore, StoreState};

/// Page used to load every candidate of the selection control.
const CANDIDATE_PAGE_SIZE: u32 = 1000;

/// Raw submitted values keyed by field path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Client-side validation failure of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Why a submission did not produce a saved entity.
#[derive(Debug, Error)]
pub enum FormError {
    /// Validation failed; nothing was dispatched.
    #[error("Validation failed: {}", join_errors(.0))]
    Invalid(Vec<FieldError>),

    #[error(transparent)]
    Request(#[from] ApiError),
}

fn join_errors(errors: &[FieldError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Mapping from submitted form values onto an entity.
pub trait FormBinding: Entity {
    /// Merge `values` onto `self`. Fields missing from `values` keep their
    /// current value; invalid fields are reported in `errors`. The id is
    /// read-only and never bound.
    fn bind(&mut self, values: &FormValues, errors: &mut Vec<FieldError>);
}

/// Text inputs are taken verbatim.
pub fn bind_text(target: &mut Option<String>, values: &FormValues, field: &str) {
    if let Some(value) = values.get(field) {
        *target = Some(value.to_string());
    }
}

/// Date inputs: blank clears the date, anything else must be `YYYY-MM-DD`.
pub fn bind_date(
    target: &mut Option<NaiveDate>,
    values: &FormValues,
    field: &str,
    errors: &mut Vec<FieldError>,
) {
    let Some(value) = values.get(field) else {
        return;
    };
    let value = value.trim();
    if value.is_empty() {
        *target = None;
        return;
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => *target = Some(date),
        Err(_) => errors.push(FieldError::new(field, "This field should be a date.")),
    }
}

/// Selection inputs: blank clears the reference, anything else must be an id.
pub fn bind_reference<R: Entity>(
    target: &mut Option<R>,
    values: &FormValues,
    field: &str,
    errors: &mut Vec<FieldError>,
) {
    let Some(value) = values.get(field) else {
        return;
    };
    let value = value.trim();
    if value.is_empty() {
        *target = None;
        return;
    }
    match value.parse::<EntityId>() {
        Ok(id) => {
            let mut reference = R::default();
            reference.set_id(Some(id));
            *target = Some(reference);
        }
        Err(_) => errors.push(FieldError::new(field, "This field should be an identifier.")),
    }
}

/// Whether the form creates a new entity or edits a persisted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(EntityId),
}

impl FormMode {
    /// Decide the mode from the route parameter; no id means create.
    pub fn from_route(id: Option<&str>) -> Result<Self, ApiError> {
        match id.map(str::trim).filter(|id| !id.is_empty()) {
            None => Ok(FormMode::Create),
            Some(raw) => raw
                .parse()
                .map(FormMode::Edit)
                .map_err(|_| ApiError::Invalid(format!("invalid id in route: {raw}"))),
        }
    }
}

/// One entry of a selection control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Request to leave the form for another route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: String,
}

/// Create/edit controller for `E`, offering `R` entities for selection.
pub struct EntityForm<E: FormBinding, R: Entity> {
    store: Arc<EntityStore<E>>,
    related: Arc<EntityStore<R>>,
    mode: FormMode,
    updates: watch::Receiver<StoreState<E>>,
    last_update_success: bool,
    candidates: PageRequest,
}

impl<E: FormBinding, R: Entity> EntityForm<E, R> {
    /// Build the form for a route. The mode is fixed here for the lifetime
    /// of the form.
    pub fn new(
        store: Arc<EntityStore<E>>,
        related: Arc<EntityStore<R>>,
        route_id: Option<&str>,
    ) -> Result<Self, ApiError> {
        let mode = FormMode::from_route(route_id)?;
        let mut updates = store.subscribe();
        let last_update_success = updates.borrow_and_update().update_success;

        Ok(Self {
            store,
            related,
            mode,
            updates,
            last_update_success,
            candidates: PageRequest::new(0, CANDIDATE_PAGE_SIZE),
        })
    }

    /// Override the page used to load selection candidates.
    pub fn with_candidates(mut self, page: PageRequest) -> Self {
        self.candidates = page;
        self
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_new(&self) -> bool {
        self.mode == FormMode::Create
    }

    /// Load what the form shows: the edited entity (or a blank slice when
    /// creating) and the selection candidates. Failures are surfaced through
    /// the stores' `error_message`.
    ///
    /// Create mode resets the edited store, including its loaded list, so a
    /// current entity or `update_success` left by an earlier view cannot
    /// leak into the new form.
    pub async fn mount(&mut self) {
        let candidates = self.candidates.clone();
        match self.mode {
            FormMode::Create => {
                self.store.reset();
                if let Err(err) = self.related.fetch_list(candidates).await {
                    tracing::warn!(form = E::NAME, error = %err, "Loading selection candidates failed");
                }
            }
            FormMode::Edit(id) => {
                let (entity, related) =
                    tokio::join!(self.store.fetch_one(id), self.related.fetch_list(candidates));
                if let Err(err) = entity {
                    tracing::warn!(form = E::NAME, id, error = %err, "Loading entity failed");
                }
                if let Err(err) = related {
                    tracing::warn!(form = E::NAME, error = %err, "Loading selection candidates failed");
                }
            }
        }
        // Mounting never counts as a save.
        self.last_update_success = self.updates.borrow_and_update().update_success;
    }

    pub fn loading(&self) -> bool {
        self.store.state().loading
    }

    /// Saving is disabled while a mutation is in flight.
    pub fn updating(&self) -> bool {
        self.store.state().updating
    }

    pub fn error_message(&self) -> Option<String> {
        self.store.state().error_message
    }

    /// The entity the inputs are initialised from.
    pub fn model(&self) -> E {
        match self.mode {
            FormMode::Create => E::default(),
            FormMode::Edit(_) => self.store.state().entity,
        }
    }

    /// Options of the selection control, led by the blank option.
    pub fn related_options(&self) -> Vec<SelectOption> {
        let blank = SelectOption {
            value: String::new(),
            label: String::new(),
        };
        std::iter::once(blank)
            .chain(self.related.state().entities.iter().filter_map(|candidate| {
                candidate.id().map(|id| SelectOption {
                    value: id.to_string(),
                    label: candidate.label(),
                })
            }))
            .collect()
    }

    /// Merge `values` onto [`model`](Self::model) and dispatch a create or
    /// update. Nothing is dispatched when a field is invalid.
    pub async fn submit(&mut self, values: &FormValues) -> Result<E, FormError> {
        let mut entity = self.model();
        let mut errors = Vec::new();
        entity.bind(values, &mut errors);
        if matches!(self.mode, FormMode::Edit(_)) && entity.id().is_none() {
            errors.push(FieldError::new("id", "This field is required."));
        }
        if !errors.is_empty() {
            tracing::debug!(form = E::NAME, errors = errors.len(), "Form validation failed");
            return Err(FormError::Invalid(errors));
        }

        // The request clears `update_success`; its success is a new edge
        // even when no poll observed the cleared flag.
        self.last_update_success = false;
        let saved = match self.mode {
            FormMode::Create => self.store.create(entity).await?,
            FormMode::Edit(_) => self.store.update(entity).await?,
        };
        Ok(saved)
    }

    /// Navigation to the list view, returned once per `update_success`
    /// transition from false to true.
    pub fn poll_navigation(&mut self) -> Option<Navigation> {
        let current = self.updates.borrow_and_update().update_success;
        let fired = current && !self.last_update_success;
        self.last_update_success = current;
        fired.then(|| Navigation {
            route: E::list_route(),
        })
    }

    /// Wait for the next navigation. Returns `None` once the store is gone.
    pub async fn next_navigation(&mut self) -> Option<Navigation> {
        loop {
            if let Some(navigation) = self.poll_navigation() {
                return Some(navigation);
            }
            self.updates.changed().await.ok()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Comment, Post};

    #[test]
    fn test_bind_merges_over_current_values() {
        let mut comment = Comment::new("old", NaiveDate::from_ymd_opt(2019, 5, 5));
        comment.id = Some(4);
        let values = FormValues::new().with("text", "new").with("post.id", "9");

        let mut errors = Vec::new();
        comment.bind(&values, &mut errors);

        assert!(errors.is_empty());
        assert_eq!(comment.id, Some(4));
        assert_eq!(comment.text.as_deref(), Some("new"));
        assert_eq!(comment.creation_date, NaiveDate::from_ymd_opt(2019, 5, 5));
        assert_eq!(comment.post, Some(Post::reference(9)));
    }

    #[test]
    fn test_blank_selection_clears_reference() {
        let mut comment = Comment::default();
        comment.post = Some(Post::reference(2));

        let mut errors = Vec::new();
        comment.bind(&FormValues::new().with("post.id", ""), &mut errors);

        assert!(errors.is_empty());
        assert_eq!(comment.post, None);
    }

    #[test]
    fn test_invalid_fields_are_reported() {
        let values: FormValues = [("creationDate", "01/02/2020"), ("post.id", "abc")]
            .into_iter()
            .collect();
        let mut errors = Vec::new();
        Comment::default().bind(&values, &mut errors);

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["creationDate", "post.id"]);
    }

    #[test]
    fn test_id_is_never_bound() {
        let mut post = Post::new("t", "c");
        let mut errors = Vec::new();
        post.bind(&FormValues::new().with("id", "12"), &mut errors);
        assert_eq!(post.id, None);
    }

    #[test]
    fn test_mode_from_route() {
        assert_eq!(FormMode::from_route(None).unwrap(), FormMode::Create);
        assert_eq!(FormMode::from_route(Some("")).unwrap(), FormMode::Create);
        assert_eq!(FormMode::from_route(Some("42")).unwrap(), FormMode::Edit(42));
        assert!(FormMode::from_route(Some("new")).is_err());
    }
}
