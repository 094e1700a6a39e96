use super::*;
use crate::state::test_helpers::{self, MockBackend};

// =============================================================
// ConnectionStatus / defaults
// =============================================================

#[test]
fn connection_status_default_is_connecting() {
    assert_eq!(ConnectionStatus::default(), ConnectionStatus::Connecting);
}

#[test]
fn default_session_has_no_backend() {
    let session = Session::default();
    assert!(matches!(session.backend(), Err(ClientError::NotConnected)));
    assert!(!session.is_authenticated());
}

// =============================================================
// attach / refresh_user
// =============================================================

#[tokio::test]
async fn attach_loads_registered_user() {
    let backend = MockBackend::with_user(10);
    let session = test_helpers::session_for(&backend).await;
    assert_eq!(session.status, ConnectionStatus::Connected);
    assert!(session.is_authenticated());
    assert_eq!(session.user.as_ref().unwrap().username, "alice");
    assert_eq!(backend.calls(), ["getUser"]);
}

#[tokio::test]
async fn attach_without_user_is_connected_but_anonymous() {
    let backend = MockBackend::new();
    let session = test_helpers::session_for(&backend).await;
    assert_eq!(session.status, ConnectionStatus::Connected);
    assert!(session.user.is_none());
    assert!(session.error.is_none());
}

#[tokio::test]
async fn attach_while_offline_leaves_user_empty() {
    let backend = MockBackend::with_user(0);
    backend.set_offline(true);
    let session = test_helpers::session_for(&backend).await;
    assert_eq!(session.status, ConnectionStatus::Connected);
    assert!(session.user.is_none());
}

#[tokio::test]
async fn refresh_user_picks_up_new_registration() {
    let backend = MockBackend::new();
    let mut session = test_helpers::session_for(&backend).await;
    backend.register(test_helpers::alice(), "alice", 0);
    session.refresh_user().await;
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn refresh_user_keeps_cached_user_on_failure() {
    let backend = MockBackend::with_user(5);
    let mut session = test_helpers::session_for(&backend).await;
    backend.set_offline(true);
    session.refresh_user().await;
    assert_eq!(session.user.as_ref().unwrap().wallet_balance, test_helpers::nat(5));
}

#[tokio::test]
async fn refresh_user_without_backend_is_noop() {
    let mut session = Session::default();
    session.refresh_user().await;
    assert!(session.user.is_none());
}

// =============================================================
// probe / diagnose
// =============================================================

#[tokio::test]
async fn probe_reports_post_count() {
    let backend = MockBackend::new();
    backend.seed_post(test_helpers::dummy_post(1, "Max", "Dog", crate::net::types::Category::Lost, 1, 0));
    let session = test_helpers::session_for(&backend).await;
    let report = session.probe().await;
    assert!(report.ok);
    assert_eq!(report.post_count, 1);
    assert!(report.error.is_none());
}

#[tokio::test]
async fn probe_reports_transport_failure() {
    let backend = MockBackend::new();
    let session = test_helpers::session_for(&backend).await;
    backend.set_offline(true);
    let report = session.probe().await;
    assert!(!report.ok);
    assert!(report.error.unwrap().contains("connection refused"));
    assert!(report.hint.is_none());
}

#[tokio::test]
async fn probe_without_backend_reports_not_connected() {
    let report = Session::default().probe().await;
    assert!(!report.ok);
    assert_eq!(report.error.as_deref(), Some("Backend not initialized"));
}

#[test]
fn diagnose_root_key_failure() {
    let hint = diagnose("agent call failed: could not fetch Root Key").unwrap();
    assert!(hint.contains("dfx start"));
}

#[test]
fn diagnose_certificate_failure() {
    let hint = diagnose("agent call failed: certificate verification failed").unwrap();
    assert!(hint.contains("dfx start --clean"));
}

#[test]
fn diagnose_other_failure_has_no_hint() {
    assert!(diagnose("timed out").is_none());
}
