//! REST mapping of the remote backend, checked against a local mock server.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use studynotes_core::backend::{AppwriteBackend, AuthBackend, BackendError};
use studynotes_core::{AuthService, BackendConfig};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const DOCS: &str = "/v1/databases/db1/collections/users/documents";

fn config(server: &MockServer) -> BackendConfig {
    BackendConfig {
        endpoint: format!("{}/v1", server.uri()),
        project_id: "proj1".into(),
        database_id: "db1".into(),
        ..Default::default()
    }
}

fn account_json() -> Value {
    json!({ "$id": "acc1", "name": "bob", "email": "a@b.com", "emailVerification": false })
}

fn profile_json() -> Value {
    json!({ "$id": "doc1", "accountId": "acc1", "email": "a@b.com", "username": "bob" })
}

fn session_json() -> Value {
    json!({ "$id": "sess1", "userId": "acc1", "expire": "2030-01-01T00:00:00.000+00:00" })
}

#[tokio::test]
async fn sign_in_posts_credentials_with_project_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/account/sessions/email"))
        .and(header("X-Appwrite-Project", "proj1"))
        .and(body_partial_json(json!({ "email": "a@b.com", "password": "pw123456" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(session_json()))
        .expect(1)
        .mount(&server)
        .await;

    let backend = AppwriteBackend::new(&config(&server)).unwrap();
    let session = backend.sign_in("a@b.com", "pw123456").await.unwrap();
    assert_eq!(session.id, "sess1");
    assert_eq!(session.user_id, "acc1");
}

#[tokio::test]
async fn create_user_creates_account_session_and_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/account"))
        .and(body_partial_json(json!({ "userId": "unique()", "email": "a@b.com", "name": "bob" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(account_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/account/sessions/email"))
        .respond_with(ResponseTemplate::new(201).set_body_json(session_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(DOCS))
        .and(body_partial_json(json!({
            "documentId": "unique()",
            "data": { "accountId": "acc1", "username": "bob", "firstName": "bob", "lastName": "" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(profile_json()))
        .expect(1)
        .mount(&server)
        .await;

    let backend = AppwriteBackend::new(&config(&server)).unwrap();
    let user = backend.create_user("a@b.com", "pw123456", "bob").await.unwrap();
    assert_eq!(user.id, "doc1");
    assert_eq!(user.email, "a@b.com");
}

#[tokio::test]
async fn current_user_is_first_profile_matching_account() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DOCS))
        .and(|req: &Request| {
            req.url.query_pairs().any(|(k, v)| {
                k == "queries[]"
                    && serde_json::from_str::<Value>(&v).map_or(false, |q| {
                        q["method"] == "equal"
                            && q["attribute"] == "accountId"
                            && q["values"][0] == "acc1"
                    })
            })
        })
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "total": 1, "documents": [profile_json()] })),
        )
        .mount(&server)
        .await;

    let service = AuthService::new(Arc::new(AppwriteBackend::new(&config(&server)).unwrap()));
    let user = service.get_current_user().await.unwrap();
    assert_eq!(user.account_id, "acc1");
    assert_eq!(user.display_name(), "bob");
}

#[tokio::test]
async fn current_user_without_profile_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DOCS))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "total": 0, "documents": [] })),
        )
        .mount(&server)
        .await;

    let backend = AppwriteBackend::new(&config(&server)).unwrap();
    assert_eq!(backend.get_current_user().await.unwrap(), None);
}

#[tokio::test]
async fn unauthorized_account_is_auth_error_and_facade_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/account"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "User (role: guests) missing scope (account)",
            "code": 401,
            "type": "general_unauthorized_scope"
        })))
        .mount(&server)
        .await;

    let backend = AppwriteBackend::new(&config(&server)).unwrap();
    match backend.get_account().await {
        Err(BackendError::Auth { status, kind, .. }) => {
            assert_eq!(status, 401);
            assert_eq!(kind.as_deref(), Some("general_unauthorized_scope"));
        }
        other => panic!("expected auth error, got {other:?}"),
    }

    let service = AuthService::new(Arc::new(backend));
    assert!(service.get_current_user().await.is_none());
}

#[tokio::test]
async fn other_operations_propagate_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{DOCS}/missing")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Document with the requested ID could not be found.",
            "code": 404,
            "type": "document_not_found"
        })))
        .mount(&server)
        .await;

    let service = AuthService::new(Arc::new(AppwriteBackend::new(&config(&server)).unwrap()));
    let err = service.get_user_by_id("missing").await.unwrap_err();
    assert!(matches!(err, BackendError::NotFound { status: 404, .. }));
}

#[tokio::test]
async fn sign_out_deletes_current_session() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/account/sessions/current"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let backend = AppwriteBackend::new(&config(&server)).unwrap();
    backend.sign_out().await.unwrap();
}

#[tokio::test]
async fn profile_update_patches_document_data() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("{DOCS}/doc1")))
        .and(body_partial_json(json!({ "data": { "username": "alice" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "$id": "doc1", "accountId": "acc1", "email": "a@b.com", "username": "alice"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = AppwriteBackend::new(&config(&server)).unwrap();
    let mut updates = Map::new();
    updates.insert("username".into(), Value::from("alice"));
    let user = backend.update_user_profile("doc1", updates).await.unwrap();
    assert_eq!(user.username, "alice");
}

#[tokio::test]
async fn recovery_sends_redirect_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/account/recovery"))
        .and(body_partial_json(json!({ "email": "a@b.com", "url": "https://example.com/reset" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "$id": "tok1", "userId": "acc1", "expire": "2030-01-01T00:00:00.000+00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = AppwriteBackend::new(&config(&server))
        .unwrap()
        .with_recovery_url("https://example.com/reset");
    let token = backend.reset_password("a@b.com").await.unwrap();
    assert_eq!(token.id, "tok1");
    assert_eq!(token.user_id.as_deref(), Some("acc1"));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let config = BackendConfig {
        endpoint: "http://127.0.0.1:1/v1".into(),
        project_id: "proj1".into(),
        ..Default::default()
    };
    let backend = AppwriteBackend::new(&config).unwrap();
    let err = backend.list_sessions().await.unwrap_err();
    assert!(matches!(err, BackendError::Network { .. }), "got {err:?}");
}

#[tokio::test]
async fn password_reset_completion_puts_secret_and_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/account/recovery"))
        .and(body_partial_json(json!({
            "userId": "acc1",
            "secret": "s3cret",
            "password": "newpass123",
            "passwordAgain": "newpass123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "$id": "tok2", "userId": "acc1", "expire": "2030-01-01T00:00:00.000+00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = AppwriteBackend::new(&config(&server)).unwrap();
    let token = backend
        .complete_password_reset("acc1", "s3cret", "newpass123", "newpass123")
        .await
        .unwrap();
    assert_eq!(token.id, "tok2");
}

#[tokio::test]
async fn verification_email_posts_redirect_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/account/verification"))
        .and(body_partial_json(json!({ "url": "https://example.com/verify" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "$id": "tok3", "userId": "acc1", "expire": "2030-01-01T00:00:00.000+00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = AppwriteBackend::new(&config(&server))
        .unwrap()
        .with_verification_url("https://example.com/verify");
    let token = backend.send_verification_email().await.unwrap();
    assert_eq!(token.id, "tok3");
    assert_eq!(token.expire.as_deref(), Some("2030-01-01T00:00:00.000+00:00"));
}

#[tokio::test]
async fn verify_email_puts_user_and_secret() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/account/verification"))
        .and(body_partial_json(json!({ "userId": "acc1", "secret": "v3rify" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "$id": "tok4", "userId": "acc1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = AppwriteBackend::new(&config(&server)).unwrap();
    let token = backend.verify_email("acc1", "v3rify").await.unwrap();
    assert_eq!(token.id, "tok4");
}

#[tokio::test]
async fn list_sessions_reads_total_and_sessions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/account/sessions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "total": 1, "sessions": [session_json()] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let backend = AppwriteBackend::new(&config(&server)).unwrap();
    let list = backend.list_sessions().await.unwrap();
    assert_eq!(list.total, 1);
    assert_eq!(list.sessions[0].id, "sess1");
}

#[tokio::test]
async fn delete_session_targets_session_id() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/account/sessions/sess1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let backend = AppwriteBackend::new(&config(&server)).unwrap();
    backend.delete_session("sess1").await.unwrap();
}

#[tokio::test]
async fn delete_all_sessions_deletes_collection() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/account/sessions"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let backend = AppwriteBackend::new(&config(&server)).unwrap();
    backend.delete_all_sessions().await.unwrap();
}
