use autoriza_client::Context;
use autoriza_shared::account::Role;
use axum::{http::StatusCode, response::IntoResponse, routing::post, Form, Json, Router};
use serial_test::serial;
use std::{collections::HashMap, net::TcpListener, sync::Arc};

use super::{at, token};
use crate::session::{
    decode_claims, FileTokenStore, MemoryTokenStore, Session, TokenStore, LOGIN_FAILED,
};

const NOW: i64 = 1_741_600_000;

fn session_with(token: Option<String>) -> (Arc<Context>, Session) {
    let store = MemoryTokenStore::default();
    if let Some(token) = token {
        store.save(&token).unwrap();
    }
    let cx = Arc::new(Context::new("http://127.0.0.1:1"));
    (cx.clone(), Session::new(cx, store))
}

#[test]
fn claims() {
    let claims = decode_claims(&token("prof@example.com", Role::Admin, NOW)).unwrap();
    assert_eq!(claims.sub, "prof@example.com");
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.exp, NOW);

    assert_eq!(decode_claims("not-a-token"), None);
    assert_eq!(decode_claims("a.%%%.c"), None);
}

#[test]
fn restore_valid() {
    let token = token("prof@example.com", Role::Professor, NOW + 60);
    let (cx, session) = session_with(Some(token.clone()));

    let state = session.initialize_at(at(NOW));
    assert!(state.is_authenticated());
    assert_eq!(state.role(), Some(Role::Professor));
    assert_eq!(state.user.unwrap().email, "prof@example.com");
    assert_eq!(cx.token(), Some(token));
}

#[test]
fn restore_expired() {
    let (cx, session) = session_with(Some(token("prof@example.com", Role::Admin, NOW)));

    let state = session.initialize_at(at(NOW));
    assert!(!state.is_authenticated());
    assert_eq!(cx.token(), None);

    // The expired token was cleared, so nothing is restored later either.
    assert!(!session.initialize_at(at(NOW - 3600)).is_authenticated());
}

#[test]
fn restore_malformed() {
    let (_, session) = session_with(Some("garbage".to_owned()));
    assert!(!session.initialize_at(at(NOW)).is_authenticated());

    let (_, session) = session_with(None);
    assert!(!session.initialize_at(at(NOW)).is_authenticated());
}

#[test]
fn logout_notifies() {
    let (cx, session) = session_with(Some(token("prof@example.com", Role::Admin, NOW + 60)));
    session.initialize_at(at(NOW));
    let mut changes = session.subscribe();
    assert!(changes.borrow().is_admin());

    session.logout();
    assert!(changes.has_changed().unwrap());
    assert!(!changes.borrow_and_update().is_authenticated());
    assert_eq!(cx.token(), None);
    assert!(!session.initialize_at(at(NOW)).is_authenticated());
}

#[test]
#[serial]
fn file_store() {
    let path = std::env::temp_dir().join("autoriza-token-test").join("token");
    let store = FileTokenStore::new(&path);
    store.clear();
    assert_eq!(store.load(), None);

    store.save("abc.def.ghi").unwrap();
    assert_eq!(store.load().as_deref(), Some("abc.def.ghi"));

    store.clear();
    assert_eq!(store.load(), None);
    store.clear();
}

async fn login(Form(form): Form<HashMap<String, String>>) -> impl IntoResponse {
    if form.get("username").map(String::as_str) == Some("prof@example.com")
        && form.get("password").map(String::as_str) == Some("senha12345")
    {
        let exp = chrono::Utc::now().timestamp() + 3600;
        (
            StatusCode::OK,
            Json(serde_json::json!({
                "access_token": token("prof@example.com", Role::Professor, exp),
                "token_type": "bearer",
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "detail": "Email ou senha incorretos" })),
        )
    }
}

async fn spawn() -> Arc<Context> {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/auth/token", post(login));
    tokio::spawn(axum::Server::from_tcp(listener).unwrap().serve(app.into_make_service()));
    Arc::new(Context::new(format!("http://{addr}")))
}

#[tokio::test]
async fn login_flow() {
    let cx = spawn().await;
    let session = Session::new(cx.clone(), MemoryTokenStore::default());

    assert_eq!(
        session.login("prof@example.com", "errada").await.unwrap_err(),
        "Email ou senha incorretos"
    );
    assert!(!session.state().is_authenticated());
    assert_eq!(cx.token(), None);

    let user = session
        .login(" prof@example.com ", "senha12345")
        .await
        .unwrap();
    assert_eq!(user.email, "prof@example.com");
    assert_eq!(user.role, Role::Professor);
    assert!(session.state().is_authenticated());
    assert!(cx.token().is_some());

    // The persisted token restores the session.
    assert!(session.initialize().is_authenticated());
}

#[tokio::test]
async fn login_unreachable() {
    let (_, session) = session_with(None);
    let message = session.login("prof@example.com", "senha12345").await.unwrap_err();
    assert_eq!(message, "action failed");
    assert_ne!(message, LOGIN_FAILED);
}
