//! Every client operation against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port in a background runtime, then
//! drives `UsersClient` over real HTTP through `UreqTransport`. This checks
//! that request shapes, the `application/json; utf-8` header and response
//! handling line up with an actual server.

use std::fs;
use std::net::SocketAddr;

use mock_server::{Comment, Fixture, Post};
use users_core::{ClientConfig, ClientError, UsersClient};

/// Serve `fixture` on a random local port and return its address.
fn start_server(fixture: Fixture) -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::serve(listener, fixture).await
        })
        .unwrap();
    });

    addr
}

fn config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::new(format!("http://{addr}"))
}

#[test]
fn user_lifecycle() {
    let addr = start_server(Fixture::sample());
    let client = UsersClient::new(&config(addr));

    // Step 1: list — the two sample users.
    let listed = client.list_users().unwrap();
    assert_eq!(listed.status, 200);
    let users: serde_json::Value = serde_json::from_str(&listed.body).unwrap();
    assert_eq!(users.as_array().unwrap().len(), 2);

    // Step 2: create with caller-supplied JSON.
    let created = client
        .create_user(r#"{"name":"Ann Example","username":"ann","email":"ann@example.com"}"#)
        .unwrap();
    assert_eq!(created.status, 201);
    let created: serde_json::Value = serde_json::from_str(&created.body).unwrap();
    assert_eq!(created["id"], 3);
    assert_eq!(created["username"], "ann");

    // Step 3: get by id.
    let fetched = client.get_user(3).unwrap();
    assert!(fetched.is_success());
    let fetched: serde_json::Value = serde_json::from_str(&fetched.body).unwrap();
    assert_eq!(fetched, created);

    // Step 4: find by username.
    let found = client.find_user_by_username("ann").unwrap();
    let found: serde_json::Value = serde_json::from_str(&found.body).unwrap();
    assert_eq!(found, serde_json::json!([created]));

    // Step 5: update.
    let updated = client
        .update_user(3, r#"{"name":"Ann Updated","username":"ann","email":"ann@example.com"}"#)
        .unwrap();
    assert_eq!(updated.status, 200);
    let updated: serde_json::Value = serde_json::from_str(&updated.body).unwrap();
    assert_eq!(updated["name"], "Ann Updated");

    // Step 6: delete — status only.
    assert_eq!(client.delete_user(3).unwrap(), 200);

    // Step 7: get after delete — 404 body comes back as data.
    let missing = client.get_user(3).unwrap();
    assert_eq!(missing.status, 404);
    assert_eq!(missing.body, "{}");

    // Step 8: delete again.
    assert_eq!(client.delete_user(3).unwrap(), 404);
}

#[test]
fn rejected_body_is_returned_not_raised() {
    let addr = start_server(Fixture::sample());
    let client = UsersClient::new(&config(addr));

    let response = client.create_user(r#"{"name":"missing fields"}"#).unwrap();
    assert_eq!(response.status, 422);
    assert!(response.body.contains("error"));
}

#[test]
fn open_tasks_for_sample_user() {
    let addr = start_server(Fixture::sample());
    let client = UsersClient::new(&config(addr));

    let open = client.open_tasks(1).unwrap();
    assert_eq!(
        open,
        concat!(
            r#"[{"userId":1,"id":1,"title":"delectus aut autem","completed":false},"#,
            r#"{"userId":1,"id":2,"title":"quis ut nam facilis","completed":false}]"#,
        )
    );

    assert_eq!(client.open_tasks(2).unwrap(), "[]");
}

#[test]
fn save_comments_for_newest_post() {
    let fixture = Fixture {
        posts: vec![
            Post {
                user_id: 9,
                id: 1,
                title: "first".to_string(),
                body: "b".to_string(),
            },
            Post {
                user_id: 9,
                id: 5,
                title: "latest".to_string(),
                body: "b".to_string(),
            },
        ],
        comments: vec![Comment {
            post_id: 5,
            id: 1,
            name: "n".to_string(),
            email: "e@x.y".to_string(),
            body: "hi".to_string(),
        }],
        ..Fixture::default()
    };
    let addr = start_server(fixture);
    let dir = tempfile::tempdir().unwrap();
    let client = UsersClient::new(&config(addr).with_output_dir(dir.path()));

    let saved = client.save_last_post_comments(9).unwrap();

    assert_eq!(saved.post_id, 5);
    assert_eq!(saved.path, dir.path().join("user-9-post-5-comments.json"));
    assert_eq!(
        fs::read_to_string(&saved.path).unwrap(),
        r#"[{"postId":5,"id":1,"name":"n","email":"e@x.y","body":"hi"}]"#
    );
}

#[test]
fn save_comments_without_posts_fails() {
    let addr = start_server(Fixture::sample());
    let dir = tempfile::tempdir().unwrap();
    let client = UsersClient::new(&config(addr).with_output_dir(dir.path()));

    let err = client.save_last_post_comments(2).unwrap_err();
    assert!(matches!(err, ClientError::NoPosts { user_id: 2 }));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn server_gone_is_a_transport_error() {
    // Bind then drop to get a port nothing is listening on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = UsersClient::new(&config(addr));

    assert!(matches!(client.list_users(), Err(ClientError::Transport(_))));
}
