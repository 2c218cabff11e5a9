//! Blocking client for the users API and its nested collections.
//!
//! # Design
//! `UsersClient` holds only its configuration and a `Transport`, and carries
//! no mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` as plain data and a step that runs
//! it through the transport. The `build_*` half never touches the network,
//! so request shapes are testable on their own.
//!
//! Every operation blocks the calling thread until its exchange (or, for
//! `save_last_post_comments`, both exchanges in sequence) completes. There is
//! no timeout, retry or cancellation beyond what the transport provides.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::extract::{self, join_trimmed_lines, last_post_id};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport, JSON_CONTENT_TYPE};
use crate::types::{ApiResponse, SavedComments};

/// Client for `{base_url}/users`, `{base_url}/users/{id}/{todos,posts}` and
/// `{base_url}/posts/{id}/comments`.
#[derive(Debug, Clone)]
pub struct UsersClient<T = UreqTransport> {
    base_url: String,
    output_dir: PathBuf,
    transport: T,
}

impl UsersClient {
    /// Client backed by a fresh `ureq` agent.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T> UsersClient<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            output_dir: config.output_dir.clone(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_create_user(&self, user_json: &str) -> HttpRequest {
        json_request(HttpMethod::Post, self.users_url(), user_json)
    }

    pub fn build_update_user(&self, id: u64, user_json: &str) -> HttpRequest {
        json_request(HttpMethod::Put, self.user_url(id), user_json)
    }

    pub fn build_delete_user(&self, id: u64) -> HttpRequest {
        bare_request(HttpMethod::Delete, self.user_url(id))
    }

    pub fn build_list_users(&self) -> HttpRequest {
        bare_request(HttpMethod::Get, self.users_url())
    }

    pub fn build_get_user(&self, id: u64) -> HttpRequest {
        bare_request(HttpMethod::Get, self.user_url(id))
    }

    /// `username` is inserted as-is; the caller must pass URL-safe text.
    pub fn build_find_user_by_username(&self, username: &str) -> HttpRequest {
        bare_request(HttpMethod::Get, format!("{}?username={username}", self.users_url()))
    }

    pub fn build_list_todos(&self, user_id: u64) -> HttpRequest {
        bare_request(HttpMethod::Get, format!("{}/todos", self.user_url(user_id)))
    }

    pub fn build_list_posts(&self, user_id: u64) -> HttpRequest {
        bare_request(HttpMethod::Get, format!("{}/posts", self.user_url(user_id)))
    }

    pub fn build_list_comments(&self, post_id: u64) -> HttpRequest {
        bare_request(
            HttpMethod::Get,
            format!("{}/posts/{post_id}/comments", self.base_url),
        )
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: u64) -> String {
        format!("{}/users/{id}", self.base_url)
    }
}

impl<T: Transport> UsersClient<T> {
    /// `POST /users` with `user_json` sent verbatim.
    pub fn create_user(&self, user_json: &str) -> Result<ApiResponse, ClientError> {
        self.exchange(&self.build_create_user(user_json))
    }

    /// `PUT /users/{id}` with `user_json` sent verbatim.
    pub fn update_user(&self, id: u64, user_json: &str) -> Result<ApiResponse, ClientError> {
        self.exchange(&self.build_update_user(id, user_json))
    }

    /// `DELETE /users/{id}`. Only the status is reported; the body is dropped.
    pub fn delete_user(&self, id: u64) -> Result<u16, ClientError> {
        self.send(&self.build_delete_user(id))
            .map(|response| response.status)
    }

    pub fn list_users(&self) -> Result<ApiResponse, ClientError> {
        self.exchange(&self.build_list_users())
    }

    pub fn get_user(&self, id: u64) -> Result<ApiResponse, ClientError> {
        self.exchange(&self.build_get_user(id))
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<ApiResponse, ClientError> {
        self.exchange(&self.build_find_user_by_username(username))
    }

    /// Fetches the user's todos and returns the incomplete ones as a JSON
    /// array. Each kept element is the server's text for it, unchanged.
    #[instrument(skip(self))]
    pub fn open_tasks(&self, user_id: u64) -> Result<String, ClientError> {
        let todos = self.exchange(&self.build_list_todos(user_id))?;
        Ok(extract::open_tasks(&todos.body))
    }

    /// Finds the user's highest post id, fetches that post's comments and
    /// writes them to `{output_dir}/user-{user_id}-post-{post_id}-comments.json`,
    /// replacing any existing file.
    ///
    /// Fails with `ClientError::NoPosts` before the second request when no
    /// post carries an id.
    #[instrument(skip(self))]
    pub fn save_last_post_comments(&self, user_id: u64) -> Result<SavedComments, ClientError> {
        let posts = self.exchange(&self.build_list_posts(user_id))?;
        let post_id = last_post_id(&posts.body).ok_or(ClientError::NoPosts { user_id })?;

        let comments = self.exchange(&self.build_list_comments(post_id))?;
        let path = self.comments_path(user_id, post_id);
        fs::write(&path, comments.body.as_bytes()).map_err(|source| ClientError::Write {
            path: path.clone(),
            source,
        })?;

        info!(post_id, path = %path.display(), "comments saved");
        Ok(SavedComments { post_id, path })
    }

    /// The bare file name when writing into the working directory, so the
    /// reported path reads `user-1-post-3-comments.json` rather than `./...`.
    fn comments_path(&self, user_id: u64, post_id: u64) -> PathBuf {
        let name = comments_file_name(user_id, post_id);
        if self.output_dir == Path::new(".") {
            PathBuf::from(name)
        } else {
            self.output_dir.join(name)
        }
    }

    fn exchange(&self, request: &HttpRequest) -> Result<ApiResponse, ClientError> {
        let response = self.send(request)?;
        Ok(ApiResponse {
            status: response.status,
            body: join_trimmed_lines(&response.body),
        })
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        debug!(method = request.method.as_str(), url = %request.path, "sending request");
        let response = self.transport.execute(request)?;
        if (200..300).contains(&response.status) {
            debug!(status = response.status, "received response");
        } else {
            warn!(status = response.status, url = %request.path, "non-success status");
        }
        Ok(response)
    }
}

/// Name of the file `save_last_post_comments` writes.
pub fn comments_file_name(user_id: u64, post_id: u64) -> String {
    format!("user-{user_id}-post-{post_id}-comments.json")
}

fn bare_request(method: HttpMethod, path: String) -> HttpRequest {
    HttpRequest {
        method,
        path,
        headers: Vec::new(),
        body: None,
    }
}

fn json_request(method: HttpMethod, path: String, body: &str) -> HttpRequest {
    HttpRequest {
        method,
        path,
        headers: vec![("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())],
        body: Some(body.to_string()),
    }
}
