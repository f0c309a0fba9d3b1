mod common;

use std::time::Duration;

use lifehub_client::config::ClientOptions;
use lifehub_client::error::Error;
use lifehub_client::session::{CredentialStore, SessionEvent};
use lifehub_client::tasks::TaskFilter;
use lifehub_client::users::NewUser;
use lifehub_client::LifeHub;
use serde_json::json;
use tokio::sync::broadcast::error::TryRecvError;
use wiremock::matchers::{body_json, body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{anonymous, login_json, signed_in, task_json, user_json, CountingStore, TOKEN};

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = MockServer::start().await;
    let (hub, _) = signed_in(&server);

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;

    let user = hub.users().me().await.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.full_name, "Alice Martin");
}

#[tokio::test]
async fn test_no_token_without_session() {
    let server = MockServer::start().await;
    let (hub, _) = anonymous(&server);

    Mock::given(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = hub.tasks().list(&TaskFilter::default()).await.unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_error_detail_is_surfaced() {
    let server = MockServer::start().await;
    let (hub, store) = signed_in(&server);

    Mock::given(method("GET"))
        .and(path("/api/tasks/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Task not found"})))
        .mount(&server)
        .await;

    let err = hub.tasks().get(42).await.unwrap_err();
    assert_eq!(err, Error::request(404, "Task not found"));
    assert_eq!(err.status(), Some(404));
    // only a 401 touches the credentials
    assert_eq!(store.clears(), 0);
    assert!(hub.session().is_authenticated());
}

#[tokio::test]
async fn test_validation_errors_are_joined() {
    let server = MockServer::start().await;
    let (hub, _) = signed_in(&server);

    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [
                {"loc": ["body", "title"], "msg": "field required", "type": "value_error.missing"},
                {"loc": ["body", "priority"], "msg": "invalid priority", "type": "type_error.enum"}
            ]
        })))
        .mount(&server)
        .await;

    let err = hub
        .tasks()
        .create(&lifehub_client::tasks::NewTask::new(""))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        Error::request(422, "field required; invalid priority")
    );
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let server = MockServer::start().await;
    let (hub, _) = signed_in(&server);

    Mock::given(method("GET"))
        .and(path("/api/budget/overview"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
        .mount(&server)
        .await;

    let err = hub.budget().overview().await.unwrap_err();
    assert_eq!(err, Error::request(502, "Bad gateway"));
}

#[tokio::test]
async fn test_unauthorized_clears_session_once() {
    let server = MockServer::start().await;
    let (hub, store) = signed_in(&server);
    let mut events = hub.session().subscribe();

    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Could not validate credentials"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = hub.tasks().list(&TaskFilter::default()).await.unwrap_err();
    assert_eq!(err, Error::AuthExpired("Could not validate credentials".to_string()));
    assert!(err.is_unauthorized());

    assert_eq!(store.clears(), 1);
    assert!(store.load().unwrap().is_none());
    assert!(!hub.session().is_authenticated());
    assert_eq!(events.try_recv(), Ok(SessionEvent::Expired));
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn test_next_call_after_expiry_sends_no_token() {
    let server = MockServer::start().await;
    let (hub, _) = signed_in(&server);

    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Not authenticated"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Not authenticated"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let first = hub.tasks().list(&TaskFilter::default()).await.unwrap_err();
    let second = hub.tasks().list(&TaskFilter::default()).await.unwrap_err();
    assert_eq!(first, second);
    assert!(matches!(second, Error::AuthExpired(_)));
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    let options = ClientOptions::default()
        .with_base_url(&format!("{}/api", server.uri()))
        .with_request_timeout(Duration::from_millis(100));
    let hub = LifeHub::new(options).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/shopping/stats/summary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::summary_json(1, 0))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let err = hub.shopping().summary().await.unwrap_err();
    assert_eq!(err, Error::Timeout(Duration::from_millis(100)));
}

#[tokio::test]
async fn test_unreachable_server() {
    let options = ClientOptions::default().with_base_url("http://127.0.0.1:1/api");
    let hub = LifeHub::new(options).unwrap();

    let err = hub.tasks().get(1).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)), "unexpected error: {:?}", err);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_malformed_response_body() {
    let server = MockServer::start().await;
    let (hub, _) = signed_in(&server);

    Mock::given(method("GET"))
        .and(path("/api/tasks/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "one"})))
        .mount(&server)
        .await;

    let err = hub.tasks().get(1).await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[tokio::test]
async fn test_login_sends_form_and_stores_token() {
    let server = MockServer::start().await;
    let (hub, store) = anonymous(&server);
    let mut events = hub.session().subscribe();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=alice%40example.com"))
        .and(body_string_contains("password=s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_json(TOKEN)))
        .expect(1)
        .mount(&server)
        .await;

    let response = hub.auth().login("alice@example.com", "s3cret").await.unwrap();
    assert_eq!(response.user.username, "alice");

    assert_eq!(hub.session().access_token().as_deref(), Some(TOKEN));
    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored.access_token, TOKEN);
    assert_eq!(stored.user.unwrap().email, "alice@example.com");
    assert_eq!(events.try_recv(), Ok(SessionEvent::SignedIn));
}

#[tokio::test]
async fn test_invalid_login_stores_nothing() {
    let server = MockServer::start().await;
    let (hub, store) = anonymous(&server);
    let mut events = hub.session().subscribe();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Incorrect email or password"})),
        )
        .mount(&server)
        .await;

    let err = hub.auth().login("alice@example.com", "wrong").await.unwrap_err();
    assert_eq!(err, Error::request(401, "Incorrect email or password"));

    assert!(store.load().unwrap().is_none());
    assert!(hub.session().access_token().is_none());
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn test_restore_confirms_stored_session() {
    let server = MockServer::start().await;
    let store = std::sync::Arc::new(CountingStore::holding(TOKEN));
    let hub = LifeHub::with_store(common::options(&server), store.clone()).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;

    let user = hub.auth().restore().await.unwrap();
    assert_eq!(user.map(|u| u.id), Some(1));
    assert!(hub.session().is_authenticated());
    assert_eq!(store.clears(), 0);
}

#[tokio::test]
async fn test_restore_drops_rejected_session() {
    let server = MockServer::start().await;
    let store = std::sync::Arc::new(CountingStore::holding(TOKEN));
    let hub = LifeHub::with_store(common::options(&server), store.clone()).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})))
        .mount(&server)
        .await;

    let mut events = hub.session().subscribe();
    assert_eq!(hub.auth().restore().await.unwrap(), None);
    assert!(store.load().unwrap().is_none());
    assert_eq!(store.clears(), 1);
    assert!(!hub.session().is_authenticated());
    assert_eq!(events.try_recv(), Ok(SessionEvent::Expired));
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn test_restore_keeps_error_when_server_fails() {
    let server = MockServer::start().await;
    let store = std::sync::Arc::new(CountingStore::holding(TOKEN));
    let hub = LifeHub::with_store(common::options(&server), store.clone()).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"detail": "Maintenance"})))
        .mount(&server)
        .await;

    let err = hub.auth().restore().await.unwrap_err();
    assert_eq!(err, Error::request(503, "Maintenance"));
    assert_eq!(store.clears(), 1);
    assert!(!hub.session().is_authenticated());
}

#[tokio::test]
async fn test_sign_up_registers_then_signs_in() {
    let server = MockServer::start().await;
    let (hub, store) = anonymous(&server);
    let mut events = hub.session().subscribe();

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({
            "email": "alice@example.com",
            "username": "alice",
            "password": "s3cret"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_string_contains("username=alice%40example.com"))
        .and(body_string_contains("password=s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_json(TOKEN)))
        .expect(1)
        .mount(&server)
        .await;

    let user = NewUser::new("alice@example.com", "alice", "s3cret");
    let response = hub.auth().sign_up(&user).await.unwrap();
    assert_eq!(response.user.username, "alice");

    assert_eq!(store.load().unwrap().unwrap().access_token, TOKEN);
    assert_eq!(events.try_recv(), Ok(SessionEvent::SignedIn));
}

#[tokio::test]
async fn test_failed_registration_skips_login() {
    let server = MockServer::start().await;
    let (hub, store) = anonymous(&server);

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Email already registered"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_json(TOKEN)))
        .expect(0)
        .mount(&server)
        .await;

    let user = NewUser::new("alice@example.com", "alice", "s3cret");
    let err = hub.auth().sign_up(&user).await.unwrap_err();
    assert_eq!(err, Error::request(400, "Email already registered"));
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_restore_without_session_makes_no_request() {
    let server = MockServer::start().await;
    let (hub, _) = anonymous(&server);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(1, "unused", false)))
        .expect(0)
        .mount(&server)
        .await;

    assert_eq!(hub.auth().restore().await.unwrap(), None);
}
