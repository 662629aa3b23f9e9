//! In-process endpoint tests driving the router through `tower::oneshot`,
//! with the upstream catalog and the identity provider both mocked at the
//! HTTP seam. No test opens a socket.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bytes::Bytes;
use core_auth::{AuthError, IdentityProvider, Session, SessionChange, UserIdentity};
use core_catalog::MusixmatchClient;
use core_runtime::http::{HttpClient, HttpRequest, HttpResponse};
use http_body_util::BodyExt;
use mockall::mock;
use proxy_server::routes::{router, AppState};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower::ServiceExt;

mock! {
    pub Http {}

    #[async_trait]
    impl HttpClient for Http {
        async fn execute(
            &self,
            request: HttpRequest,
        ) -> core_runtime::http::Result<HttpResponse>;
    }
}

/// Identity provider with a canned sign-in outcome.
struct StubIdentity {
    sign_in_result: core_auth::Result<Session>,
    changes: broadcast::Sender<SessionChange>,
}

impl StubIdentity {
    fn new(sign_in_result: core_auth::Result<Session>) -> Self {
        let (changes, _) = broadcast::channel(8);
        Self {
            sign_in_result,
            changes,
        }
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn restore_session(&self) -> core_auth::Result<Option<Session>> {
        Ok(None)
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> core_auth::Result<Session> {
        self.sign_in_result.clone()
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _country: &str,
    ) -> core_auth::Result<Session> {
        self.sign_in_result.clone()
    }

    async fn sign_out(&self) -> core_auth::Result<()> {
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }
}

fn test_session() -> Session {
    Session {
        user: UserIdentity {
            id: "user-1".to_string(),
            email: "a@example.com".to_string(),
        },
        country: Some("DE".to_string()),
        expires_at: None,
    }
}

fn upstream_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: Bytes::from(body.to_string()),
    }
}

fn app_with(catalog_http: MockHttp, identity: StubIdentity) -> axum::Router {
    let state = Arc::new(AppState {
        catalog: Arc::new(MusixmatchClient::new(
            Arc::new(catalog_http),
            "test-key",
            "https://api.test/ws/1.1",
        )),
        identity: Arc::new(identity),
    });
    router(state)
}

fn app(catalog_http: MockHttp) -> axum::Router {
    app_with(catalog_http, StubIdentity::new(Ok(test_session())))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::post(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn missing_artist_id_is_rejected_without_upstream_call() {
    let mut mock = MockHttp::new();
    mock.expect_execute().times(0);

    let (status, body) = get(app(mock), "/musixmatch/albums").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Artist ID is required"}));
}

#[tokio::test]
async fn unparseable_album_id_is_rejected_without_upstream_call() {
    let mut mock = MockHttp::new();
    mock.expect_execute().times(0);

    let (status, body) = get(app(mock), "/musixmatch/tracks?albumId=notanumber").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Album ID is required"}));
}

#[tokio::test]
async fn artist_chart_propagates_country_and_default_paging() {
    let mut mock = MockHttp::new();
    mock.expect_execute()
        .withf(|req| {
            req.url.contains("chart.artists.get")
                && req.url.contains("country=DE")
                && req.url.contains("page=1")
                && req.url.contains("page_size=10")
        })
        .times(1)
        .returning(|_| {
            Ok(upstream_response(
                200,
                r#"{"message": {"header": {"status_code": 200}, "body": {"artist_list": [
                    {"artist": {"artist_id": 7, "artist_name": "Rammstein"}}
                ]}}}"#,
            ))
        });

    let (status, body) = get(app(mock), "/musixmatch/artists?country=DE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["artists"][0]["artist_name"], "Rammstein");
}

#[tokio::test]
async fn empty_upstream_list_is_an_empty_array() {
    let mut mock = MockHttp::new();
    mock.expect_execute().returning(|_| {
        Ok(upstream_response(
            200,
            r#"{"message": {"header": {"status_code": 200}, "body": {"album_list": []}}}"#,
        ))
    });

    let (status, body) = get(app(mock), "/musixmatch/albums?artistId=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"albums": []}));
}

#[tokio::test]
async fn upstream_garbage_becomes_generic_500() {
    let mut mock = MockHttp::new();
    mock.expect_execute()
        .returning(|_| Ok(upstream_response(200, "<html>totally not json</html>")));

    let (status, body) = get(app(mock), "/musixmatch/tracks?albumId=42").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to fetch tracks"}));
}

#[tokio::test]
async fn absent_lyrics_serialize_as_null() {
    let mut mock = MockHttp::new();
    mock.expect_execute().returning(|_| {
        Ok(upstream_response(
            200,
            r#"{"message": {"header": {"status_code": 404}, "body": []}}"#,
        ))
    });

    let (status, body) = get(app(mock), "/musixmatch/lyrics?trackId=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"lyrics": null}));
}

#[tokio::test]
async fn login_returns_user_on_success() {
    let app = app_with(MockHttp::new(), StubIdentity::new(Ok(test_session())));

    let (status, body) = post_json(
        app,
        "/auth/login",
        json!({"email": "a@example.com", "password": "pw"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "a@example.com");
}

#[tokio::test]
async fn login_rejection_passes_provider_message_through() {
    let app = app_with(
        MockHttp::new(),
        StubIdentity::new(Err(AuthError::Rejected(
            "Invalid login credentials".to_string(),
        ))),
    );

    let (status, body) = post_json(
        app,
        "/auth/login",
        json!({"email": "a@example.com", "password": "wrong"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid login credentials"}));
}

#[tokio::test]
async fn login_provider_outage_is_a_generic_500() {
    let app = app_with(
        MockHttp::new(),
        StubIdentity::new(Err(AuthError::ProviderUnavailable(
            "connection refused to 10.0.0.1".to_string(),
        ))),
    );

    let (status, body) = post_json(
        app,
        "/auth/login",
        json!({"email": "a@example.com", "password": "pw"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn login_without_credentials_is_rejected() {
    let app = app_with(MockHttp::new(), StubIdentity::new(Ok(test_session())));

    let (status, body) = post_json(app, "/auth/login", json!({"email": "a@example.com"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Email and password are required"}));
}

#[tokio::test]
async fn logout_answers_empty_object() {
    let app = app_with(MockHttp::new(), StubIdentity::new(Ok(test_session())));

    let (status, body) = post_json(app, "/auth/logout", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get(app(MockHttp::new()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}
