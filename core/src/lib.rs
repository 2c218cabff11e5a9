//! Blocking API client core for the users service.
//!
//! # Overview
//! Talks to a JSONPlaceholder-style API: the `users` collection, its nested
//! `todos` and `posts` collections, and `posts/{id}/comments`. Read and write
//! operations hand back the status and body text; two operations derive a
//! value from a collection (open todos, comments of the newest post).
//!
//! # Design
//! - `UsersClient` is stateless: it holds its configuration and a transport.
//! - Requests are built as plain data by `build_*` methods and executed by a
//!   `Transport`, so the I/O boundary is explicit and stubbable.
//! - Non-2xx responses are returned as data, never raised.
//! - Collection bodies are decoded structurally; kept elements are emitted
//!   with their original text.

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod types;

pub use client::{comments_file_name, UsersClient};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{ApiResponse, PostSummary, SavedComments, TodoItem};
