//! Domain entities - the records cached by the client stores.

mod comment;
mod post;
mod user;

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use comment::Comment;
pub use post::Post;
pub use user::User;

/// Server-assigned identifier of a persisted entity.
pub type EntityId = i64;

/// A record type exposed by the REST API as a collection resource.
///
/// The identifier is absent exactly while the entity has never been
/// persisted. `Default` is the empty entity held by a store with nothing
/// selected.
pub trait Entity:
    Clone + fmt::Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Singular name, used for routes and log fields (`comment`).
    const NAME: &'static str;

    /// Collection segment of the resource paths (`comments`).
    const COLLECTION: &'static str;

    fn id(&self) -> Option<EntityId>;

    fn set_id(&mut self, id: Option<EntityId>);

    /// Display field shown when the entity is offered in a selection control.
    fn label(&self) -> String;

    /// Drop references that do not carry an identifier before the entity is
    /// sent to the server.
    fn clean(self) -> Self {
        self
    }

    /// Route of the entity's list view.
    fn list_route() -> String {
        format!("/{}", Self::NAME)
    }
}

/// Keep a reference only if it points at a persisted entity.
pub(crate) fn persisted<R: Entity>(reference: Option<R>) -> Option<R> {
    reference.filter(|r| r.id().is_some())
}
