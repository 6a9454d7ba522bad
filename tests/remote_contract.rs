//! HTTP contract tests for the PostgREST store and the auth endpoint.
//!
//! The store uses a blocking client, so each call runs on the blocking pool
//! while the mock server keeps serving on the async runtime.

use chrono::{Duration, Utc};
use serde_json::json;
use tasklist::io::remote_store::{self, RemoteStore};
use tasklist::io::session::{self, Session};
use tasklist::io::store::{self, StoreError, TodoStore};
use tasklist::model::{AppConfig, Backend, RemoteConfig, TodoId, TodoPatch};
use tasklist::ops::{Outcome, TodoList};
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn remote_config(uri: &str) -> RemoteConfig {
    RemoteConfig {
        url: uri.to_string(),
        anon_key: "anon-key".into(),
        table: "todos".into(),
        timeout_secs: 5,
    }
}

fn session() -> Session {
    Session {
        access_token: "tok".into(),
        refresh_token: Some("refresh-1".into()),
        user_id: "u1".into(),
        email: Some("a@example.com".into()),
        expires_at: None,
    }
}

fn store_for(server: &MockServer) -> RemoteStore {
    RemoteStore::new(&remote_config(&server.uri()), session())
}

fn row(id: i64, text: &str, completed: bool) -> serde_json::Value {
    json!({
        "id": id,
        "text": text,
        "completed": completed,
        "created_at": "2024-03-01T10:00:00+00:00",
        "user_id": "u1"
    })
}

fn grant(access_token: &str, refresh_token: &str) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "expires_in": 3600,
        "user": {"id": "u1", "email": "a@example.com"}
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Table requests
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_load_is_scoped_to_user_and_newest_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/todos"))
        .and(query_param("select", "*"))
        .and(query_param("user_id", "eq.u1"))
        .and(query_param("order", "created_at.desc"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            row(2, "Second", false),
            row(3, "   ", false),
            row(1, "First", true)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = store_for(&server);
    let todos = tokio::task::spawn_blocking(move || store.load())
        .await
        .unwrap()
        .unwrap();

    let texts: Vec<&str> = todos.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["Second", "First"]);
    assert_eq!(todos[0].id, TodoId::new("2"));
    assert!(todos[1].completed);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_insert_sends_text_and_owner() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/todos"))
        .and(query_param("select", "*"))
        .and(header("Prefer", "return=representation"))
        .and(header("Authorization", "Bearer tok"))
        .and(body_json(json!({"text": "Buy milk", "user_id": "u1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([row(
            7, "Buy milk", false
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = store_for(&server);
    let todo = tokio::task::spawn_blocking(move || store.insert("Buy milk"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(todo.id, TodoId::new("7"));
    assert_eq!(todo.text, "Buy milk");
    assert!(!todo.completed);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_insert_without_returned_row_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/todos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = store_for(&server);
    let result = tokio::task::spawn_blocking(move || store.insert("Buy milk"))
        .await
        .unwrap();

    assert!(matches!(result, Err(StoreError::EmptyResponse)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_filters_ids_and_sends_patch() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/todos"))
        .and(query_param("id", "in.(1,2)"))
        .and(query_param("user_id", "eq.u1"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(json!({"completed": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            row(1, "First", true),
            row(2, "Second", true)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = store_for(&server);
    let ids = vec![TodoId::new("1"), TodoId::new("2")];
    let confirmed =
        tokio::task::spawn_blocking(move || store.update(&ids, &TodoPatch::completed(true)))
            .await
            .unwrap()
            .unwrap();

    assert_eq!(confirmed.len(), 2);
    assert!(confirmed.iter().all(|t| t.completed));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_filters_id_and_owner() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/todos"))
        .and(query_param("id", "eq.1"))
        .and(query_param("user_id", "eq.u1"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = store_for(&server);
    let result = tokio::task::spawn_blocking(move || store.delete(&[TodoId::new("1")]))
        .await
        .unwrap();

    assert!(result.is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_carries_status_and_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/todos"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "db down"})))
        .mount(&server)
        .await;

    let mut store = store_for(&server);
    let result = tokio::task::spawn_blocking(move || store.load())
        .await
        .unwrap();

    match result {
        Err(StoreError::Status { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "db down");
        }
        other => panic!("expected a status error, got {:?}", other),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Auth
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_sign_in_uses_password_grant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-key"))
        .and(body_json(json!({"email": "a@example.com", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant("tok", "refresh-1")))
        .expect(1)
        .mount(&server)
        .await;

    let config = remote_config(&server.uri());
    let session = tokio::task::spawn_blocking(move || {
        remote_store::sign_in(&config, "a@example.com", "hunter2")
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(session.access_token, "tok");
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(session.user_id, "u1");
    assert!(!session.is_expired(Utc::now()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_sign_in_reports_description() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let config = remote_config(&server.uri());
    let result = tokio::task::spawn_blocking(move || {
        remote_store::sign_in(&config, "a@example.com", "wrong")
    })
    .await
    .unwrap();

    match result {
        Err(StoreError::Status { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid login credentials");
        }
        other => panic!("expected a status error, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_session_is_refreshed_on_open() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_json(json!({"refresh_token": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(grant("tok-2", "refresh-2")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/todos"))
        .and(header("Authorization", "Bearer tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(1, "First", false)])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let expired = Session {
        expires_at: Some(Utc::now() - Duration::minutes(5)),
        ..session()
    };
    session::write_session(dir.path(), &expired).unwrap();

    let config = AppConfig {
        backend: Backend::Remote,
        remote: Some(remote_config(&server.uri())),
        ..Default::default()
    };
    let home = dir.path().to_path_buf();
    let todos = tokio::task::spawn_blocking(move || {
        let mut store = store::open_store(&home, &config)?;
        store.load()
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(todos.len(), 1);
    let saved = session::read_session(dir.path()).unwrap();
    assert_eq!(saved.access_token, "tok-2");
    assert_eq!(saved.refresh_token.as_deref(), Some("refresh-2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_refresh_is_not_signed_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error_description": "Invalid Refresh Token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let expired = Session {
        expires_at: Some(Utc::now() - Duration::minutes(5)),
        ..session()
    };
    session::write_session(dir.path(), &expired).unwrap();

    let config = AppConfig {
        backend: Backend::Remote,
        remote: Some(remote_config(&server.uri())),
        ..Default::default()
    };
    let home = dir.path().to_path_buf();
    let result = tokio::task::spawn_blocking(move || store::open_store(&home, &config).map(|_| ()))
        .await
        .unwrap();

    assert!(matches!(result, Err(StoreError::NotSignedIn)));
}

// ────────────────────────────────────────────────────────────────────────────
// Through the list controller
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_insert_leaves_list_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(1, "First", false)])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/todos"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "db down"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let (before, outcome, after) = tokio::task::spawn_blocking(move || {
        let mut list = TodoList::open(Box::new(store)).unwrap();
        let before = list.todos().to_vec();
        let outcome = list.add("Buy milk");
        (before, outcome, list.todos().to_vec())
    })
    .await
    .unwrap();

    assert_eq!(before, after);
    let Outcome::Failed(notification) = &outcome else {
        panic!("expected a failed outcome, got {:?}", outcome);
    };
    assert!(notification.is_destructive());
    assert_eq!(notification.title, "Could not add todo");
    assert!(notification.description.contains("db down"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_toggle_applies_confirmed_row() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(1, "First", false)])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/todos"))
        .and(query_param("id", "eq.1"))
        .and(body_json(json!({"completed": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(1, "First", true)])))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let (outcome, after) = tokio::task::spawn_blocking(move || {
        let mut list = TodoList::open(Box::new(store)).unwrap();
        let outcome = list.toggle(&TodoId::new("1"));
        (outcome, list.todos().to_vec())
    })
    .await
    .unwrap();

    assert!(matches!(outcome, Outcome::Applied(_)));
    assert!(after[0].completed);
}
