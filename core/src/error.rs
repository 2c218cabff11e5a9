//! Error types for the users API client.
//!
//! # Design
//! Non-2xx responses are not errors here: the status travels back to the
//! caller alongside the body in `ApiResponse`. The only failures are the ones
//! the client cannot turn into a payload: the exchange itself failing, a
//! posts collection with nothing to chain on, and the output file write.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by `UsersClient` operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP exchange could not be completed (DNS, connect, TLS or read).
    #[error("transport failure: {0}")]
    Transport(String),

    /// No post in the user's collection carried a usable `id`.
    #[error("no posts found for user {user_id}")]
    NoPosts { user_id: u64 },

    /// The comments file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
