use crate::domain::Entity;
use crate::pagination::{Links, merge_page};

use super::event::StoreEvent;

/// Client-side cache of one entity type and the status of its requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState<E> {
    /// A search, list or single-entity fetch is in flight.
    pub loading: bool,
    /// A create, update or delete is in flight.
    pub updating: bool,
    /// The latest mutating request succeeded and nothing was requested since.
    pub update_success: bool,
    pub error_message: Option<String>,
    /// The current entity; `E::default()` when nothing is selected.
    pub entity: E,
    pub entities: Vec<E>,
    pub total_items: u64,
    pub links: Links,
}

impl<E: Entity> StoreState<E> {
    /// Apply one event.
    pub fn apply(&mut self, event: StoreEvent<E>) {
        match event {
            StoreEvent::Requested(operation) => {
                self.error_message = None;
                self.update_success = false;
                if operation.is_mutation() {
                    self.updating = true;
                } else {
                    self.loading = true;
                }
            }
            StoreEvent::Failed { message, .. } => {
                self.loading = false;
                self.updating = false;
                self.update_success = false;
                self.error_message = Some(message);
            }
            StoreEvent::ListLoaded { page, .. } => {
                self.loading = false;
                self.links = page.links;
                self.total_items = page.total_items;
                self.entities = merge_page(std::mem::take(&mut self.entities), page);
            }
            StoreEvent::EntityLoaded(entity) => {
                self.loading = false;
                self.entity = entity;
            }
            StoreEvent::Saved { entity, .. } => {
                self.updating = false;
                self.update_success = true;
                self.entity = entity;
            }
            StoreEvent::Deleted => {
                self.updating = false;
                self.update_success = true;
                self.entity = E::default();
            }
            StoreEvent::Reset => *self = Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Comment;
    use crate::pagination::Page;
    use crate::store::Operation;

    fn persisted(id: i64, text: &str) -> Comment {
        Comment {
            id: Some(id),
            ..Comment::new(text, NaiveDate::from_ymd_opt(2020, 1, 1))
        }
    }

    #[test]
    fn test_read_request_sets_loading_and_clears_error() {
        let mut state = StoreState::<Comment> {
            error_message: Some("boom".to_string()),
            update_success: true,
            ..Default::default()
        };
        state.apply(StoreEvent::Requested(Operation::FetchList));

        assert!(state.loading);
        assert!(!state.updating);
        assert!(!state.update_success);
        assert_eq!(state.error_message, None);
    }

    #[test]
    fn test_failure_clears_in_flight_flags() {
        let mut state = StoreState::<Comment>::default();
        state.apply(StoreEvent::Requested(Operation::Create));
        assert!(state.updating);

        state.apply(StoreEvent::Failed {
            operation: Operation::Create,
            message: "Request failed with status 400: idexists".to_string(),
        });
        assert!(!state.loading);
        assert!(!state.updating);
        assert!(!state.update_success);
        assert_eq!(
            state.error_message.as_deref(),
            Some("Request failed with status 400: idexists")
        );
    }

    #[test]
    fn test_empty_collection_sets_zero_total() {
        let mut state = StoreState::<Comment> {
            entities: vec![persisted(1, "stale")],
            total_items: 1,
            ..Default::default()
        };
        state.apply(StoreEvent::Requested(Operation::FetchList));
        state.apply(StoreEvent::ListLoaded {
            operation: Operation::FetchList,
            page: Page::empty(),
        });

        assert!(!state.loading);
        assert_eq!(state.total_items, 0);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_save_then_delete() {
        let mut state = StoreState::<Comment>::default();
        state.apply(StoreEvent::Requested(Operation::Create));
        state.apply(StoreEvent::Saved {
            operation: Operation::Create,
            entity: persisted(7, "hi"),
        });
        assert!(state.update_success);
        assert_eq!(state.entity.id, Some(7));

        state.apply(StoreEvent::Requested(Operation::Delete));
        assert!(!state.update_success);
        state.apply(StoreEvent::Deleted);
        assert!(state.update_success);
        assert_eq!(state.entity, Comment::default());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut state = StoreState::<Comment>::default();
        state.apply(StoreEvent::Requested(Operation::Search));
        state.apply(StoreEvent::EntityLoaded(persisted(3, "x")));
        state.apply(StoreEvent::Failed {
            operation: Operation::Update,
            message: "nope".to_string(),
        });
        state.apply(StoreEvent::Reset);

        assert_eq!(state, StoreState::default());
    }
}

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;
    use crate::domain::Comment;
    use crate::pagination::{Links, Page};
    use crate::store::Operation;

    fn operation() -> impl Strategy<Value = Operation> {
        prop::sample::select(Operation::ALL.to_vec())
    }

    fn event() -> impl Strategy<Value = StoreEvent<Comment>> {
        prop_oneof![
            operation().prop_map(StoreEvent::Requested),
            operation().prop_map(|operation| StoreEvent::Failed {
                operation,
                message: format!("{operation} failed"),
            }),
            (0u32..3, 0u64..10).prop_map(|(page, total)| StoreEvent::ListLoaded {
                operation: Operation::FetchList,
                page: Page::new(
                    vec![Comment::new("c", None)],
                    total,
                    Links::for_page(page, 1, total),
                ),
            }),
            (1i64..100).prop_map(|id| {
                let mut comment = Comment::new("c", None);
                comment.id = Some(id);
                StoreEvent::EntityLoaded(comment)
            }),
            (1i64..100).prop_map(|id| {
                let mut comment = Comment::new("saved", None);
                comment.id = Some(id);
                StoreEvent::Saved {
                    operation: Operation::Update,
                    entity: comment,
                }
            }),
            Just(StoreEvent::Deleted),
            Just(StoreEvent::Reset),
        ]
    }

    /// Reference model of the flags, tracked event by event.
    #[derive(Default)]
    struct Flags {
        loading: bool,
        updating: bool,
        update_success: bool,
        has_error: bool,
    }

    impl Flags {
        fn step(&mut self, event: &StoreEvent<Comment>) {
            match event {
                StoreEvent::Requested(op) => {
                    if op.is_mutation() {
                        self.updating = true;
                    } else {
                        self.loading = true;
                    }
                    self.update_success = false;
                    self.has_error = false;
                }
                StoreEvent::Failed { .. } => {
                    *self = Flags {
                        has_error: true,
                        ..Flags::default()
                    };
                }
                StoreEvent::ListLoaded { .. } | StoreEvent::EntityLoaded(_) => self.loading = false,
                StoreEvent::Saved { .. } | StoreEvent::Deleted => {
                    self.updating = false;
                    self.update_success = true;
                }
                StoreEvent::Reset => *self = Flags::default(),
            }
        }
    }

    proptest! {
        #[test]
        fn flags_follow_request_lifecycle(events in prop::collection::vec(event(), 0..40)) {
            let mut state = StoreState::<Comment>::default();
            let mut model = Flags::default();

            for event in events {
                model.step(&event);
                state.apply(event);

                prop_assert_eq!(state.loading, model.loading);
                prop_assert_eq!(state.updating, model.updating);
                prop_assert_eq!(state.update_success, model.update_success);
                prop_assert_eq!(state.error_message.is_some(), model.has_error);
            }
        }

        #[test]
        fn reset_always_restores_initial_state(events in prop::collection::vec(event(), 0..40)) {
            let mut state = StoreState::<Comment>::default();
            for event in events {
                state.apply(event);
            }
            state.apply(StoreEvent::Reset);
            prop_assert_eq!(state, StoreState::default());
        }

        #[test]
        fn update_success_requires_mutation_success(events in prop::collection::vec(event(), 1..40)) {
            let mut state = StoreState::<Comment>::default();
            for event in &events {
                state.apply(event.clone());
            }
            let last_relevant = events
                .iter()
                .rev()
                .find(|e| !matches!(e, StoreEvent::ListLoaded { .. } | StoreEvent::EntityLoaded(_)));
            let expected = matches!(
                last_relevant,
                Some(StoreEvent::Saved { .. } | StoreEvent::Deleted)
            );
            prop_assert_eq!(state.update_success, expected);
        }
    }
}
