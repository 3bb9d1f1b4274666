//! Drives the reqwest adapter and the dispatcher against an in-process
//! axum server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::Redirect;
use axum::routing::{any, get};
use axum::Json;
use khabari_application::ports::{HttpClient, HttpClientError, TransportRequest};
use khabari_application::{Clock, Dispatcher};
use khabari_domain::{
    ApiKeyLocation, AppSettings, AuthConfig, Headers, HttpMethod, QueryParam, Request,
    ResponseBody,
};
use khabari_infrastructure::{ReqwestHttpClient, SystemClock};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Value> {
    Json(json!({
        "method": method.as_str(),
        "query": uri.query().unwrap_or(""),
        "authorization": headers.get("authorization").and_then(|v| v.to_str().ok()),
        "x-api-key": headers.get("x-api-key").and_then(|v| v.to_str().ok()),
        "body": body,
    }))
}

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/echo", any(echo))
        .route("/text", get(|| async { "plain body" }))
        .route(
            "/broken-json",
            get(|| async { ([("content-type", "application/json")], "{oops") }),
        )
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "nope") }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "late"
            }),
        )
        .route("/loop", get(|| async { Redirect::temporary("/loop") }))
        .route("/hop", get(|| async { Redirect::temporary("/text") }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn dispatcher(settings: &AppSettings) -> Dispatcher<ReqwestHttpClient> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    Dispatcher::new(
        Arc::new(ReqwestHttpClient::with_settings(settings).unwrap()),
        clock,
    )
}

fn request(method: HttpMethod, url: String) -> Request {
    let mut request = Request::new("r1", chrono::Utc::now());
    request.method = method;
    request.url = url;
    request
}

#[tokio::test]
async fn post_sends_body_and_auth_header() {
    let addr = spawn_server().await;
    let mut req = request(HttpMethod::Post, format!("http://{addr}/echo"));
    req.headers.insert("Content-Type", "application/json");
    req.headers.insert("Authorization", "overridden");
    req.body = r#"{"name":"khabari"}"#.to_string();
    req.auth = AuthConfig::basic("u", "p");

    let response = dispatcher(&AppSettings::default()).send(&req).await.unwrap();

    assert_eq!(response.status(), 200);
    let ResponseBody::Json(body) = response.data() else {
        panic!("expected JSON, got {:?}", response.data());
    };
    assert_eq!(body["method"], "POST");
    assert_eq!(body["authorization"], "Basic dTpw");
    assert_eq!(body["body"], r#"{"name":"khabari"}"#);
    assert_eq!(response.size_bytes(), response.data().serialized().len());
}

#[tokio::test]
async fn get_drops_body_and_appends_key_to_query() {
    let addr = spawn_server().await;
    let mut req = request(HttpMethod::Get, format!("http://{addr}/echo?q=a+b"));
    req.body = "ignored".to_string();
    req.params = vec![
        QueryParam::new("q", "a b"),
        QueryParam::disabled("skip", "1"),
    ];
    req.auth = AuthConfig::api_key("token", "k1", ApiKeyLocation::Query);

    let response = dispatcher(&AppSettings::default()).send(&req).await.unwrap();
    let ResponseBody::Json(body) = response.data() else {
        panic!("expected JSON");
    };
    assert_eq!(body["body"], "");
    assert_eq!(body["query"], "q=a+b&token=k1");
}

#[tokio::test]
async fn api_key_header_is_sent() {
    let addr = spawn_server().await;
    let mut req = request(HttpMethod::Delete, format!("http://{addr}/echo"));
    req.auth = AuthConfig::api_key("X-Api-Key", "k2", ApiKeyLocation::Header);

    let response = dispatcher(&AppSettings::default()).send(&req).await.unwrap();
    let ResponseBody::Json(body) = response.data() else {
        panic!("expected JSON");
    };
    assert_eq!(body["method"], "DELETE");
    assert_eq!(body["x-api-key"], "k2");
}

#[tokio::test]
async fn non_json_and_broken_json_are_text() {
    let addr = spawn_server().await;
    let d = dispatcher(&AppSettings::default());

    let text = d
        .send(&request(HttpMethod::Get, format!("http://{addr}/text")))
        .await
        .unwrap();
    assert_eq!(text.data(), &ResponseBody::Text("plain body".to_string()));
    assert_eq!(text.size_display(), "10 B");

    let broken = d
        .send(&request(HttpMethod::Get, format!("http://{addr}/broken-json")))
        .await
        .unwrap();
    assert_eq!(broken.data(), &ResponseBody::Text("{oops".to_string()));
}

#[tokio::test]
async fn not_found_is_a_normal_response() {
    let addr = spawn_server().await;
    let response = dispatcher(&AppSettings::default())
        .send(&request(HttpMethod::Get, format!("http://{addr}/missing")))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(response.status_text(), "Not Found");
}

#[tokio::test]
async fn redirects_are_followed() {
    let addr = spawn_server().await;
    let response = dispatcher(&AppSettings::default())
        .send(&request(HttpMethod::Get, format!("http://{addr}/hop")))
        .await
        .unwrap();
    assert_eq!(response.data(), &ResponseBody::Text("plain body".to_string()));
}

#[tokio::test]
async fn timeout_is_reported() {
    let addr = spawn_server().await;
    let settings = AppSettings {
        request_timeout_ms: 100,
        ..AppSettings::default()
    };
    let client = ReqwestHttpClient::with_settings(&settings).unwrap();
    let err = client
        .execute(TransportRequest {
            method: HttpMethod::Get,
            url: format!("http://{addr}/slow"),
            headers: Headers::new(),
            body: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err, HttpClientError::Timeout { timeout_ms: 100 });
}

#[tokio::test]
async fn redirect_loop_is_reported() {
    let addr = spawn_server().await;
    let settings = AppSettings {
        max_redirects: 2,
        ..AppSettings::default()
    };
    let err = dispatcher(&settings)
        .send(&request(HttpMethod::Get, format!("http://{addr}/loop")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), &HttpClientError::TooManyRedirects { max: 2 });
}

#[tokio::test]
async fn refused_connection_is_reported() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = dispatcher(&AppSettings::default())
        .send(&request(HttpMethod::Get, format!("http://127.0.0.1:{port}/")))
        .await
        .unwrap_err();
    match err.kind() {
        HttpClientError::ConnectionRefused { port: p, .. } => assert_eq!(*p, port),
        HttpClientError::ConnectionFailed(_) => {}
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.message().is_empty());
}

#[tokio::test]
async fn options_is_answered_without_a_server() {
    let mut req = request(HttpMethod::Options, "http://127.0.0.1:9/never".to_string());
    req.auth = AuthConfig::bearer("t");

    let response = dispatcher(&AppSettings::default()).send(&req).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.elapsed(), Duration::ZERO);
    assert_eq!(response.header("Authorization"), Some("Bearer t"));
}
