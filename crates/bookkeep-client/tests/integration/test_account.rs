use std::sync::Arc;

use bookkeep_client::{
    id::CompanyId,
    navigator::AuthState,
    session::Session,
    store::{FileSessionStore, SessionStore},
    Client, Error,
};
use http::StatusCode;
use serde_json::{json, Value};

use crate::support::{harness, session, FakeBackend, FakeTransport, RefreshReply};

#[test_log::test(tokio::test)]
async fn login_stores_tokens() {
    let h = harness(Session::default());
    let auth_state = h.client.auth_state();
    assert_eq!(*auth_state.borrow(), AuthState::Unauthenticated);

    let login = h.client.login("owner@acme.test", "hunter2").await.unwrap();

    assert_eq!(login.username.as_deref(), Some("owner"));
    assert_eq!(
        *h.store.session(),
        session("login-access", "login-refresh")
    );
    assert_eq!(*auth_state.borrow(), AuthState::Authenticated);

    let request = &h.backend.requests()[0];
    assert_eq!(request.authorization, None);
    assert_eq!(
        request.json(),
        json!({ "email": "owner@acme.test", "password": "hunter2" })
    );

    let _: Value = h.client.current_user().await.unwrap();
    assert_eq!(
        h.backend.requests()[1].authorization.as_deref(),
        Some("Bearer login-access")
    );
}

#[test_log::test(tokio::test)]
async fn wrong_password_is_not_a_session_failure() {
    let h = harness(Session::default());

    let err = h.client.login("owner@acme.test", "wrong").await.unwrap_err();

    let Error::Status(status_error) = err else {
        panic!("expected status error, got {err:?}");
    };
    assert_eq!(status_error.status, StatusCode::UNAUTHORIZED);
    assert_eq!(status_error.message().as_deref(), Some("Invalid credentials"));
    assert_eq!(h.backend.refresh_calls(), 0);
    assert_eq!(*h.store.session(), Session::default());
    assert!(h.navigator.routes().is_empty());
}

#[test_log::test(tokio::test)]
async fn logout_forgets_everything() {
    let h = harness(Session {
        selected_company_id: Some(CompanyId::new(42)),
        ..session("good", "valid")
    });
    let auth_state = h.client.auth_state();
    assert_eq!(*auth_state.borrow(), AuthState::Authenticated);

    h.client.logout().unwrap();

    assert_eq!(*h.store.session(), Session::default());
    assert_eq!(*auth_state.borrow(), AuthState::Unauthenticated);
    assert!(h.navigator.routes().is_empty());
}

#[test_log::test(tokio::test)]
async fn restore_accepted_session() {
    let h = harness(session("good", "valid"));
    h.backend.accept_token("good");
    h.backend.serve("/customer/", r#"{"username":"owner"}"#);

    let user = h.client.restore_session().await.unwrap();

    assert_eq!(user, Some(json!({ "username": "owner" })));
    assert!(h.store.session().is_authenticated());
}

#[test_log::test(tokio::test)]
async fn restore_without_session_makes_no_requests() {
    let h = harness(Session::default());

    assert_eq!(h.client.restore_session().await.unwrap(), None);
    assert!(h.backend.requests().is_empty());
}

#[test_log::test(tokio::test)]
async fn restore_rejected_session_logs_out() {
    let h = harness(session("expired", "revoked"));
    h.backend.on_refresh(RefreshReply::Reject(StatusCode::UNAUTHORIZED));

    let user = h.client.restore_session().await.unwrap();

    assert_eq!(user, None);
    assert_eq!(*h.store.session(), Session::default());
    assert_eq!(*h.client.auth_state().borrow(), AuthState::Unauthenticated);
}

#[test_log::test(tokio::test)]
async fn selected_company_details() {
    let h = harness(session("good", "valid"));
    h.backend.accept_token("good");
    h.backend.serve("/company/42/", r#"{"id":42,"name":"Acme"}"#);

    assert_eq!(h.client.selected_company().await.unwrap(), None);

    h.client.select_company(Some(CompanyId::new(42))).unwrap();
    let company = h.client.selected_company().await.unwrap();

    assert_eq!(company, Some(json!({ "id": 42, "name": "Acme" })));
    assert_eq!(h.backend.requests()[0].company.as_deref(), Some("42"));

    h.client.clear_company().unwrap();
    assert_eq!(h.client.selected_company_id(), None);
    assert!(h.store.session().is_authenticated());
}

#[test_log::test(tokio::test)]
async fn company_scoped_lists_need_a_company() {
    let h = harness(session("good", "valid"));
    h.backend.accept_token("good");

    let err = h.client.parties().await.unwrap_err();
    assert!(matches!(err, Error::NoCompanySelected));
    assert!(h.backend.requests().is_empty());

    h.client.select_company(Some(CompanyId::new(42))).unwrap();
    h.client.parties().await.unwrap();
    h.client.items(7).await.unwrap();

    let requests = h.backend.requests();
    assert_eq!(requests[0].path, "/parties/");
    assert_eq!(requests[0].method, http::Method::POST);
    assert_eq!(requests[0].json(), json!({ "company": 42 }));
    assert_eq!(requests[1].json(), json!({ "company": 42, "customer_id": 7 }));
}

#[test_log::test(tokio::test)]
async fn file_backed_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let backend = FakeBackend::new();

    let client = Client::builder()
        .with_url("http://bookkeep.test")
        .with_transport(Arc::new(FakeTransport(backend.clone())))
        .with_session_store(Arc::new(FileSessionStore::open(&path).unwrap()))
        .build()
        .unwrap();

    client.login("owner@acme.test", "hunter2").await.unwrap();
    client.select_company(Some(CompanyId::new(3))).unwrap();
    client.close().unwrap();

    let reopened = FileSessionStore::open(&path).unwrap();
    assert_eq!(
        *reopened.session(),
        Session {
            selected_company_id: Some(CompanyId::new(3)),
            ..session("login-access", "login-refresh")
        }
    );
}
