use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub post_id: u64,
    pub id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}

/// Everything the server knows. Routes read and write this in place.
#[derive(Clone, Debug, Default)]
pub struct Fixture {
    pub users: Vec<User>,
    pub todos: Vec<Todo>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
}

impl Fixture {
    /// Two users. User 1 has four todos (two open), three posts and comments
    /// on post 3. User 2 has nothing.
    pub fn sample() -> Self {
        let user = |id: u64, name: &str, username: &str, email: &str| User {
            id,
            name: name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            extra: Map::new(),
        };
        let todo = |id: u64, title: &str, completed: bool| Todo {
            user_id: 1,
            id,
            title: title.to_string(),
            completed,
        };
        let post = |id: u64, title: &str| Post {
            user_id: 1,
            id,
            title: title.to_string(),
            body: format!("body of post {id}"),
        };
        let comment = |id: u64, email: &str| Comment {
            post_id: 3,
            id,
            name: format!("comment {id}"),
            email: email.to_string(),
            body: format!("text of comment {id}"),
        };

        Self {
            users: vec![
                user(1, "Leanne Graham", "Bret", "Sincere@april.biz"),
                user(2, "Ervin Howell", "Antonette", "Shanna@melissa.tv"),
            ],
            todos: vec![
                todo(1, "delectus aut autem", false),
                todo(2, "quis ut nam facilis", false),
                todo(3, "fugiat veniam minus", true),
                todo(4, "et porro tempora", true),
            ],
            posts: vec![
                post(1, "sunt aut facere"),
                post(3, "ea molestias quasi"),
                post(2, "qui est esse"),
            ],
            comments: vec![
                comment(11, "Eliseo@gardner.biz"),
                comment(12, "Jayne_Kuhic@sydney.com"),
            ],
        }
    }
}

pub type Db = Arc<RwLock<Fixture>>;

type ErrorReply = (StatusCode, Json<Value>);

#[derive(Deserialize)]
pub struct UserQuery {
    pub username: Option<String>,
}

/// Router over the sample data.
pub fn app() -> Router {
    app_with(Fixture::sample())
}

pub fn app_with(fixture: Fixture) -> Router {
    let db: Db = Arc::new(RwLock::new(fixture));
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/users/{id}/todos", get(list_user_todos))
        .route("/users/{id}/posts", get(list_user_posts))
        .route("/posts/{id}/comments", get(list_post_comments))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, Fixture::sample()).await
}

pub async fn serve(listener: TcpListener, fixture: Fixture) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(fixture)).await
}

fn not_found() -> ErrorReply {
    (StatusCode::NOT_FOUND, Json(json!({})))
}

/// Bodies are read as text and decoded here rather than through `Json`, so
/// any `Content-Type` is accepted, including the non-standard
/// `application/json; utf-8` the client sends.
fn decode_user(body: &str) -> Result<NewUser, ErrorReply> {
    serde_json::from_str(body).map_err(|e| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": e.to_string() })),
        )
    })
}

async fn list_users(State(db): State<Db>, Query(query): Query<UserQuery>) -> Json<Vec<User>> {
    let fixture = db.read().await;
    let users = fixture
        .users
        .iter()
        .filter(|u| query.username.as_deref().map_or(true, |name| u.username == name))
        .cloned()
        .collect();
    Json(users)
}

async fn create_user(
    State(db): State<Db>,
    body: String,
) -> Result<(StatusCode, Json<User>), ErrorReply> {
    let input = decode_user(&body)?;
    let mut fixture = db.write().await;
    let id = fixture.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
    let user = into_user(id, input);
    fixture.users.push(user.clone());
    tracing::debug!(id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<User>, ErrorReply> {
    let fixture = db.read().await;
    fixture
        .users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    body: String,
) -> Result<Json<User>, ErrorReply> {
    let input = decode_user(&body)?;
    let mut fixture = db.write().await;
    let user = fixture
        .users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(not_found)?;
    *user = into_user(id, input);
    Ok(Json(user.clone()))
}

async fn delete_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>, ErrorReply> {
    let mut fixture = db.write().await;
    let before = fixture.users.len();
    fixture.users.retain(|u| u.id != id);
    if fixture.users.len() == before {
        return Err(not_found());
    }
    Ok(Json(json!({})))
}

async fn list_user_todos(State(db): State<Db>, Path(id): Path<u64>) -> Json<Vec<Todo>> {
    let fixture = db.read().await;
    Json(fixture.todos.iter().filter(|t| t.user_id == id).cloned().collect())
}

async fn list_user_posts(State(db): State<Db>, Path(id): Path<u64>) -> Json<Vec<Post>> {
    let fixture = db.read().await;
    Json(fixture.posts.iter().filter(|p| p.user_id == id).cloned().collect())
}

async fn list_post_comments(State(db): State<Db>, Path(id): Path<u64>) -> Json<Vec<Comment>> {
    let fixture = db.read().await;
    Json(fixture.comments.iter().filter(|c| c.post_id == id).cloned().collect())
}

fn into_user(id: u64, input: NewUser) -> User {
    let mut extra = input.extra;
    extra.remove("id");
    User {
        id,
        name: input.name,
        username: input.username,
        email: input.email,
        extra,
    }
}
