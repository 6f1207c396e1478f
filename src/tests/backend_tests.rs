use super::*;
use crate::mock_backend::{account, DataReply, MockBackend, SESSION_COOKIE};
use crate::model::CsrfBody;
use axum::http::StatusCode;

#[tokio::test]
async fn fetch_data_decodes_optional_fields() {
    let backend = MockBackend::spawn(DataReply::Json(serde_json::json!({
        "csrf": "abc",
        "email": "user@example.com",
        "enabled": true,
        "num_threads": 10,
        "num_labeled": 4,
        "unexpected": "ignored",
    })))
    .await;
    let client = BackendClient::new(&backend.config()).expect("client");

    let data = client.fetch_data().await.expect("data");
    assert_eq!(data.csrf.as_deref(), Some("abc"));
    assert_eq!(data.email.as_deref(), Some("user@example.com"));
    assert_eq!(data.enabled, Some(true));
    assert_eq!(data.expired, None);
    assert_eq!(data.num_threads, Some(10));
    assert_eq!(data.num_labeled, Some(4));
}

#[tokio::test]
async fn fetch_data_rejects_error_status() {
    let backend = MockBackend::spawn(DataReply::Status(StatusCode::INTERNAL_SERVER_ERROR)).await;
    let client = BackendClient::new(&backend.config()).expect("client");

    let err = client.fetch_data().await.expect_err("must fail");
    assert!(
        matches!(err, ClientError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn fetch_data_rejects_non_json_body() {
    let backend = MockBackend::spawn(DataReply::Garbage).await;
    let client = BackendClient::new(&backend.config()).expect("client");

    let err = client.fetch_data().await.expect_err("must fail");
    assert!(matches!(err, ClientError::Decode { .. }), "unexpected error: {err}");
}

#[tokio::test]
async fn fetch_data_reports_unreachable_backend() {
    // Bind and immediately drop a listener to get a port nobody is serving.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let backend = MockBackend::spawn(DataReply::Garbage).await;
    let mut cfg = backend.config();
    cfg.base_url = format!("http://{addr}");
    let client = BackendClient::new(&cfg).expect("client");

    let err = client.fetch_data().await.expect_err("must fail");
    assert!(matches!(err, ClientError::Transport { .. }), "unexpected error: {err}");
}

#[tokio::test]
async fn post_sends_json_with_session_cookie() {
    let backend = MockBackend::spawn(DataReply::Json(account(false, false))).await;
    let client = BackendClient::new(&backend.config()).expect("client");

    // The data fetch is what sets the session cookie.
    client.fetch_data().await.expect("data");
    let resp = client
        .post("/s/enable", &CsrfBody { csrf: "token-1" })
        .await
        .expect("post");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let posts = backend.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].path, "/s/enable");
    assert_eq!(posts[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(posts[0].cookie.as_deref(), Some(SESSION_COOKIE));
    assert_eq!(posts[0].body, serde_json::json!({ "csrf": "token-1" }));
}

#[tokio::test]
async fn post_returns_error_statuses_untouched() {
    let backend = MockBackend::spawn(DataReply::Json(account(true, false))).await;
    backend.set_post_status(StatusCode::UNAUTHORIZED);
    let client = BackendClient::new(&backend.config()).expect("client");

    let resp = client
        .post("/s/disable", &CsrfBody { csrf: "token-1" })
        .await
        .expect("transport ok");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn seeded_cookie_is_sent() {
    let backend = MockBackend::spawn(DataReply::Json(account(false, false))).await;
    let mut cfg = backend.config();
    cfg.session_cookie = Some("session=from-browser".into());
    let client = BackendClient::new(&cfg).expect("client");

    client
        .post("/s/enable", &CsrfBody { csrf: "token-1" })
        .await
        .expect("post");
    assert_eq!(
        backend.posts()[0].cookie.as_deref(),
        Some("session=from-browser")
    );
}

#[tokio::test]
async fn seeded_cookie_reaches_root_endpoints_from_prefixed_base() {
    let backend = MockBackend::spawn(DataReply::Json(account(false, false))).await;
    let mut cfg = backend.config();
    cfg.base_url = format!("{}/app/", backend.base_url);
    cfg.session_cookie = Some("session=from-browser".into());
    let client = BackendClient::new(&cfg).expect("client");

    client
        .post("/s/enable", &CsrfBody { csrf: "token-1" })
        .await
        .expect("post");
    let posts = backend.posts();
    assert_eq!(posts[0].path, "/s/enable");
    assert_eq!(posts[0].cookie.as_deref(), Some("session=from-browser"));
}

#[test]
fn auth_url_is_resolved_against_base() {
    let mut cfg = crate::model::ClientConfig {
        base_url: "https://unclog.example.com/app/".into(),
        user_agent: "unclog-test".into(),
        request_timeout: None,
        in_flight_guard: false,
        validate_responses: false,
        session_cookie: None,
        open_browser: false,
    };
    let client = BackendClient::new(&cfg).expect("client");
    assert_eq!(
        client.auth_url().expect("url").as_str(),
        "https://unclog.example.com/s/auth"
    );

    cfg.base_url = "not a url".into();
    assert!(matches!(
        BackendClient::new(&cfg),
        Err(ClientError::InvalidUrl(_))
    ));
}
