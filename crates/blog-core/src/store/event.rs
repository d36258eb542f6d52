use std::fmt;

use crate::pagination::Page;

/// The request kinds a store issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Search,
    FetchList,
    FetchOne,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Search,
        Operation::FetchList,
        Operation::FetchOne,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ];

    /// Create, update and delete change server state; the others only read.
    pub fn is_mutation(self) -> bool {
        matches!(self, Operation::Create | Operation::Update | Operation::Delete)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Search => "search",
            Operation::FetchList => "fetch_list",
            Operation::FetchOne => "fetch_one",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request lifecycle event applied to a store slice.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent<E> {
    /// A request was issued.
    Requested(Operation),
    /// A request of any kind failed.
    Failed { operation: Operation, message: String },
    /// A search or list request succeeded.
    ListLoaded { operation: Operation, page: Page<E> },
    /// A single-entity fetch succeeded.
    EntityLoaded(E),
    /// A create or update succeeded with the persisted entity.
    Saved { operation: Operation, entity: E },
    /// A delete succeeded.
    Deleted,
    /// Explicit reset of the slice.
    Reset,
}

impl<E> StoreEvent<E> {
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::Requested(_) => "requested",
            StoreEvent::Failed { .. } => "failed",
            StoreEvent::ListLoaded { .. } => "list_loaded",
            StoreEvent::EntityLoaded(_) => "entity_loaded",
            StoreEvent::Saved { .. } => "saved",
            StoreEvent::Deleted => "deleted",
            StoreEvent::Reset => "reset",
        }
    }

    pub fn operation(&self) -> Option<Operation> {
        match self {
            StoreEvent::Requested(operation)
            | StoreEvent::Failed { operation, .. }
            | StoreEvent::ListLoaded { operation, .. }
            | StoreEvent::Saved { operation, .. } => Some(*operation),
            StoreEvent::EntityLoaded(_) => Some(Operation::FetchOne),
            StoreEvent::Deleted => Some(Operation::Delete),
            StoreEvent::Reset => None,
        }
    }
}
