//! Session lifecycle tests - restore, login, logout, persistence

mod common;

use common::Service;
use rollcall::api::ApiClient;
use rollcall::session::{Mode, Session, TokenStore};
use std::sync::atomic::Ordering;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> TokenStore {
    TokenStore::new(dir.path().join("token"))
}

#[tokio::test]
async fn restore_accepts_a_valid_stored_token() {
    let service = Service::with_default_roster();
    let base = common::start(service).await;
    let api = ApiClient::new(&base);
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(common::TOKEN).unwrap();

    let mut session = Session::new(store);
    session.restore(&api).await;

    assert!(session.is_authenticated());
    assert_eq!(session.display_name(), Some(common::TEACHER_NAME));
    assert_eq!(session.token(), Some(common::TOKEN));
}

#[tokio::test]
async fn restore_clears_a_rejected_token() {
    let service = Service::with_default_roster();
    let base = common::start(service).await;
    let api = ApiClient::new(&base);
    let dir = TempDir::new().unwrap();
    store_in(&dir).save("stale-token").unwrap();

    let mut session = Session::new(store_in(&dir));
    session.restore(&api).await;

    assert!(!session.is_authenticated());
    assert_eq!(session.display_name(), None);
    assert_eq!(store_in(&dir).load(), None);
}

#[tokio::test]
async fn restore_without_a_stored_token_makes_no_network_calls() {
    let service = Service::with_default_roster();
    let base = common::start(service.clone()).await;
    let api = ApiClient::new(&base);
    let dir = TempDir::new().unwrap();

    let mut session = Session::new(store_in(&dir));
    session.restore(&api).await;

    assert!(!session.is_authenticated());
    assert_eq!(service.request_count(), 0);
}

#[tokio::test]
async fn restore_clears_the_token_when_the_server_is_unreachable() {
    let api = ApiClient::new("http://127.0.0.1:1");
    let dir = TempDir::new().unwrap();
    store_in(&dir).save(common::TOKEN).unwrap();

    let mut session = Session::new(store_in(&dir));
    session.restore(&api).await;

    assert!(!session.is_authenticated());
    assert_eq!(store_in(&dir).load(), None);
}

#[tokio::test]
async fn login_persists_the_issued_token() {
    let service = Service::with_default_roster();
    let base = common::start(service).await;
    let api = ApiClient::new(&base);
    let dir = TempDir::new().unwrap();

    let mut session = Session::new(store_in(&dir));
    let name = session
        .login(&api, common::USERNAME, common::PASSWORD)
        .await
        .expect("login failed");

    assert_eq!(name, common::TEACHER_NAME);
    assert!(session.is_authenticated());
    assert_eq!(store_in(&dir).load(), Some(common::TOKEN.to_string()));
}

#[tokio::test]
async fn login_failure_leaves_the_session_untouched() {
    let service = Service::with_default_roster();
    let base = common::start(service).await;
    let api = ApiClient::new(&base);
    let dir = TempDir::new().unwrap();

    let mut session = Session::new(store_in(&dir));
    let err = session
        .login(&api, common::USERNAME, "wrong")
        .await
        .expect_err("expected login rejection");

    assert_eq!(err.detail(), Some("Invalid username or password"));
    assert!(!session.is_authenticated());
    assert_eq!(store_in(&dir).load(), None);
}

#[tokio::test]
async fn logout_clears_state_when_the_endpoint_succeeds() {
    let service = Service::with_default_roster();
    let base = common::start(service).await;
    let api = ApiClient::new(&base);
    let dir = TempDir::new().unwrap();

    let mut session = Session::new(store_in(&dir));
    session
        .login(&api, common::USERNAME, common::PASSWORD)
        .await
        .unwrap();

    session.logout(&api).await;

    assert!(!session.is_authenticated());
    assert_eq!(session.display_name(), None);
    assert_eq!(store_in(&dir).load(), None);
}

#[tokio::test]
async fn logout_clears_state_when_the_endpoint_fails() {
    let service = Service::with_default_roster();
    let base = common::start(service.clone()).await;
    let api = ApiClient::new(&base);
    let dir = TempDir::new().unwrap();

    let mut session = Session::new(store_in(&dir));
    session
        .login(&api, common::USERNAME, common::PASSWORD)
        .await
        .unwrap();
    service.fail_logout.store(true, Ordering::SeqCst);

    session.logout(&api).await;

    assert!(!session.is_authenticated());
    assert_eq!(session.display_name(), None);
    assert_eq!(store_in(&dir).load(), None);
}

#[tokio::test]
async fn mode_transitions_notify_subscribers() {
    let service = Service::with_default_roster();
    let base = common::start(service).await;
    let api = ApiClient::new(&base);
    let dir = TempDir::new().unwrap();

    let mut session = Session::new(store_in(&dir));
    let mut mode_rx = session.subscribe();

    session
        .login(&api, common::USERNAME, common::PASSWORD)
        .await
        .unwrap();
    assert!(mode_rx.has_changed().unwrap());
    assert_eq!(*mode_rx.borrow_and_update(), Mode::Authenticated);

    session.logout(&api).await;
    assert!(mode_rx.has_changed().unwrap());
    assert_eq!(*mode_rx.borrow_and_update(), Mode::Unauthenticated);
}
