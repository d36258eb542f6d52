use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Entity, EntityId, User, persisted};
use crate::detail::{DetailField, DetailView};
use crate::form::{FieldError, FormBinding, FormValues, bind_date, bind_reference, bind_text};

/// Post entity - a blog post written by a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<User>,
}

impl Post {
    /// Create a new, not yet persisted post.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Reference to this post as carried by a comment.
    pub fn reference(id: EntityId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

impl Entity for Post {
    const NAME: &'static str = "post";
    const COLLECTION: &'static str = "posts";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: Option<EntityId>) {
        self.id = id;
    }

    fn label(&self) -> String {
        self.title.clone().unwrap_or_default()
    }

    fn clean(mut self) -> Self {
        self.creator = persisted(self.creator);
        self
    }
}

impl FormBinding for Post {
    fn bind(&mut self, values: &FormValues, errors: &mut Vec<FieldError>) {
        bind_text(&mut self.title, values, "title");
        bind_text(&mut self.content, values, "content");
        bind_date(&mut self.creation_date, values, "creationDate", errors);
        bind_reference(&mut self.creator, values, "creator.id", errors);
    }
}

impl DetailView for Post {
    const HEADING: &'static str = "Post";

    fn detail_fields(&self) -> Vec<DetailField> {
        vec![
            DetailField::new("Title", self.title.clone().unwrap_or_default()),
            DetailField::new("Content", self.content.clone().unwrap_or_default()),
            DetailField::date("Creation Date", self.creation_date),
            DetailField::new(
                "Creator",
                self.creator.as_ref().map(|user| user.label()).unwrap_or_default(),
            ),
        ]
    }
}
