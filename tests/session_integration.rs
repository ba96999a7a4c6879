//! Session store against a mock backend and real storage.

mod common;

use common::*;
use sentinel::session::{AuthError, FileSessionStorage, MemorySessionStorage, Role, SessionStore};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_login(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_persists_session() {
    let server = MockServer::start().await;
    mount_login(
        &server,
        200,
        json!({"success": true, "username": "admin", "role": "ADMIN"}),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let file = dir.path().join("state").join("session.json");
    let store = SessionStore::new(http_api(&server), Box::new(FileSessionStorage::new(&file)));

    let session = store.login("admin", "admin123").await.unwrap();
    assert!(session.is_admin());
    assert!(session.authenticated);
    assert!(file.exists());

    // A fresh store (next process) sees the same session
    let next = SessionStore::new(http_api(&server), Box::new(FileSessionStorage::new(&file)));
    let restored = next.restore().unwrap();
    assert_eq!(restored.username, "admin");
    assert_eq!(restored.role, Role::Admin);
}

#[tokio::test]
async fn test_invalid_credentials_surface_server_message() {
    let server = MockServer::start().await;
    mount_login(
        &server,
        401,
        json!({"success": false, "message": "Invalid username or password"}),
    )
    .await;

    let storage = MemorySessionStorage::new();
    let store = SessionStore::new(http_api(&server), Box::new(storage.clone()));

    let err = store.login("admin", "wrong").await.unwrap_err();
    match err {
        AuthError::InvalidCredentials(message) => {
            assert_eq!(message, "Invalid username or password")
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(storage.raw().is_none());
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_unreachable_backend_is_connectivity_error() {
    let store = SessionStore::new(unreachable_api(), Box::new(MemorySessionStorage::new()));
    let err = store.login("admin", "admin123").await.unwrap_err();
    assert!(matches!(err, AuthError::Connectivity(_)));
    assert_eq!(
        err.to_string(),
        "Connection error. Make sure backend is running."
    );
}

#[tokio::test]
async fn test_logout_clears_durable_storage() {
    let storage = stored_session("user", Role::User);
    let server = MockServer::start().await;
    let store = SessionStore::new(http_api(&server), Box::new(storage.clone()));

    assert!(store.restore().is_some());
    store.logout();

    assert!(storage.raw().is_none());
    assert!(store.current().is_none());
    assert!(store.restore().is_none());
}

#[tokio::test]
async fn test_corrupt_session_file_is_unauthenticated() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("session.json");
    std::fs::write(&file, "{not json").unwrap();

    let server = MockServer::start().await;
    let store = SessionStore::new(http_api(&server), Box::new(FileSessionStorage::new(&file)));
    assert!(store.restore().is_none());
}

#[tokio::test]
async fn test_unknown_role_gets_no_admin_rights() {
    let server = MockServer::start().await;
    mount_login(
        &server,
        200,
        json!({"success": true, "username": "ops", "role": "OPERATOR"}),
    )
    .await;

    let store = SessionStore::new(http_api(&server), Box::new(MemorySessionStorage::new()));
    let session = store.login("ops", "pw").await.unwrap();
    assert_eq!(session.role, Role::Unknown);
    assert!(!session.is_admin());
}
