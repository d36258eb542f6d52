use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Entity, EntityId, Post, persisted};
use crate::detail::{DetailField, DetailView};
use crate::form::{FieldError, FormBinding, FormValues, bind_date, bind_reference, bind_text};

/// Comment entity - a reader's comment attached to a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<NaiveDate>,
    /// Commented post. Only `id` is authoritative, `title` is kept for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Post>,
}

impl Comment {
    /// Create a new, not yet persisted comment.
    pub fn new(text: impl Into<String>, creation_date: Option<NaiveDate>) -> Self {
        Self {
            text: Some(text.into()),
            creation_date,
            ..Self::default()
        }
    }
}

impl Entity for Comment {
    const NAME: &'static str = "comment";
    const COLLECTION: &'static str = "comments";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: Option<EntityId>) {
        self.id = id;
    }

    fn label(&self) -> String {
        self.text.clone().unwrap_or_default()
    }

    fn clean(mut self) -> Self {
        self.post = persisted(self.post);
        self
    }
}

impl FormBinding for Comment {
    fn bind(&mut self, values: &FormValues, errors: &mut Vec<FieldError>) {
        bind_text(&mut self.text, values, "text");
        bind_date(&mut self.creation_date, values, "creationDate", errors);
        bind_reference(&mut self.post, values, "post.id", errors);
    }
}

impl DetailView for Comment {
    const HEADING: &'static str = "Comment";

    fn detail_fields(&self) -> Vec<DetailField> {
        vec![
            DetailField::new("Text", self.text.clone().unwrap_or_default()),
            DetailField::date("Creation Date", self.creation_date),
            DetailField::new(
                "Post",
                self.post.as_ref().map(|post| post.label()).unwrap_or_default(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_flat_camel_case() {
        let mut comment = Comment::new("hi", NaiveDate::from_ymd_opt(2020, 1, 1));
        comment.post = Some(Post::reference(3));

        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"text": "hi", "creationDate": "2020-01-01", "post": {"id": 3}})
        );
    }

    #[test]
    fn test_deserializes_null_fields_as_absent() {
        let comment: Comment =
            serde_json::from_str(r#"{"id":5,"text":"x","creationDate":null,"post":null}"#).unwrap();
        assert_eq!(comment.id, Some(5));
        assert_eq!(comment.creation_date, None);
        assert_eq!(comment.post, None);
    }

    #[test]
    fn test_clean_drops_unpersisted_post() {
        let mut comment = Comment::new("hi", None);
        comment.post = Some(Post::default());
        assert_eq!(comment.clean().post, None);

        let mut comment = Comment::new("hi", None);
        comment.post = Some(Post::reference(1));
        assert_eq!(comment.clean().post, Some(Post::reference(1)));
    }
}
