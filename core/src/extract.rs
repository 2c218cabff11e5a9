//! Body reassembly and the two extraction passes over collection bodies.
//!
//! Collections are decoded as arrays of raw elements so a kept element is
//! emitted byte-for-byte as the server sent it. Each element is then decoded
//! on its own into the typed view; an element that does not fit the view is
//! skipped rather than failing the whole collection.

use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use tracing::warn;

use crate::types::{PostSummary, TodoItem};

/// Trims every line of `raw` and concatenates the results with no separator.
///
/// Only inter-token whitespace is lost for JSON, since JSON strings cannot
/// span lines.
pub fn join_trimmed_lines(raw: &str) -> String {
    raw.lines().map(str::trim).collect()
}

/// Keeps the todos whose `completed` is `false` and re-serializes them as a
/// JSON array. Anything that is not an array yields `[]`.
pub fn open_tasks(todos: &str) -> String {
    let open: Vec<&str> = elements(todos)
        .into_iter()
        .filter(|raw| decode::<TodoItem>(raw).is_some_and(|todo| todo.is_open()))
        .collect();
    format!("[{}]", open.join(","))
}

/// Highest `id` among the posts, or `None` when no element carries one.
pub fn last_post_id(posts: &str) -> Option<u64> {
    elements(posts)
        .into_iter()
        .filter_map(|raw| decode::<PostSummary>(raw).and_then(|post| post.id))
        .max()
}

fn elements(body: &str) -> Vec<&str> {
    match serde_json::from_str::<Vec<&RawValue>>(body) {
        Ok(items) => items.into_iter().map(RawValue::get).collect(),
        Err(e) => {
            warn!(error = %e, "collection body is not a JSON array");
            Vec::new()
        }
    }
}

fn decode<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_str(raw).ok()
}
