//! Response and record types for the users API.
//!
//! # Design
//! Bodies are caller-supplied or server-supplied JSON text and are passed
//! through as text. Only the two fields the client actually inspects get a
//! typed view (`TodoItem::completed`, `PostSummary::id`); every other field is
//! ignored on decode so schema additions on the server side do not break
//! extraction.

use std::path::PathBuf;

use serde::Deserialize;

/// Status code and reassembled body of a single exchange.
///
/// Returned for every status, 2xx or not. Callers that care about failure
/// inspect `status` or `is_success`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// True for statuses in `200..300`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The part of a todo the open-tasks filter looks at. Only `completed` is
/// decoded; every other field, `id` included, may hold any JSON value.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TodoItem {
    /// Open means `completed` is present and `false`.
    pub fn is_open(&self) -> bool {
        self.completed == Some(false)
    }
}

/// The part of a post the last-post lookup looks at.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PostSummary {
    #[serde(default)]
    pub id: Option<u64>,
}

/// Outcome of `UsersClient::save_last_post_comments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedComments {
    pub post_id: u64,
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_half_open() {
        let at = |status| ApiResponse {
            status,
            body: String::new(),
        };
        assert!(!at(199).is_success());
        assert!(at(200).is_success());
        assert!(at(204).is_success());
        assert!(at(299).is_success());
        assert!(!at(300).is_success());
        assert!(!at(404).is_success());
    }

    #[test]
    fn todo_item_ignores_unknown_fields() {
        let item: TodoItem =
            serde_json::from_str(r#"{"userId":1,"id":4,"title":"x","completed":false}"#).unwrap();
        assert!(item.is_open());
    }

    #[test]
    fn todo_item_accepts_any_id_shape() {
        for raw in [
            r#"{"id":"t-1","completed":false}"#,
            r#"{"id":-3,"completed":false}"#,
            r#"{"id":2.0,"completed":false}"#,
            r#"{"id":null,"completed":false}"#,
        ] {
            let item: TodoItem = serde_json::from_str(raw).unwrap();
            assert!(item.is_open(), "{raw}");
        }
    }

    #[test]
    fn todo_without_completed_is_not_open() {
        let item: TodoItem = serde_json::from_str(r#"{"id":4}"#).unwrap();
        assert!(!item.is_open());
    }

    #[test]
    fn post_summary_id_is_optional() {
        let post: PostSummary = serde_json::from_str(r#"{"title":"no id"}"#).unwrap();
        assert!(post.id.is_none());
    }
}
