use serde::{Deserialize, Serialize};

use super::{Entity, EntityId};

/// User account, owned by the identity subsystem.
///
/// Only the fields needed to reference a user and to display it in a
/// selection control are modelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

impl User {
    pub fn new(id: EntityId, login: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            login: Some(login.into()),
        }
    }
}

impl Entity for User {
    const NAME: &'static str = "user";
    const COLLECTION: &'static str = "users";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: Option<EntityId>) {
        self.id = id;
    }

    fn label(&self) -> String {
        self.login.clone().unwrap_or_default()
    }
}
