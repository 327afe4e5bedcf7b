//! End-to-end checks over real sockets.
//!
//! # Design
//! Starts a small upstream file host and the linkprobe service on random
//! ports, then posts to `/api/check` with reqwest. Exercises the reqwest
//! transport: redirects, `HEAD` refusal with the ranged `GET` fallback, HTML
//! detection and refused connections.

use std::net::SocketAddr;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
    routing::get,
    Router,
};
use linkprobe_core::{HttpMethod, HttpRequest, ProbeTransport};
use linkprobe_server::{
    config::{ProbeConfig, ServerConfig},
    transport::ReqwestTransport,
    AppState,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const CLIP: &[u8] = b"0123456789";

async fn clip() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "video/mp4")], CLIP)
}

async fn page() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        "<html><body>watch here</body></html>",
    )
}

/// Refuses `HEAD`, serves the first byte of the clip on a ranged `GET`.
async fn ranged_only(headers: HeaderMap) -> impl IntoResponse {
    let ranged = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "bytes=0-0");
    if !ranged {
        return StatusCode::RANGE_NOT_SATISFIABLE.into_response();
    }
    (
        StatusCode::PARTIAL_CONTENT,
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::CONTENT_RANGE, "bytes 0-0/10"),
        ],
        &CLIP[..1],
    )
        .into_response()
}

async fn head_not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    addr
}

async fn spawn_upstream() -> SocketAddr {
    let router = Router::new()
        .route("/clip.mp4", get(clip))
        .route("/page", get(page))
        .route("/old-clip", get(|| async { Redirect::temporary("/clip.mp4") }))
        .route("/gone.mp4", get(|| async { StatusCode::GONE }))
        .route("/track.mp3", get(ranged_only).head(head_not_allowed));
    spawn(router).await
}

async fn spawn_service() -> SocketAddr {
    let state = AppState::from_config(&ServerConfig::default()).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { linkprobe_server::run(listener, state).await.unwrap() });
    addr
}

async fn check(service: SocketAddr, url: &str) -> (StatusCode, Value) {
    let resp = reqwest::Client::new()
        .post(format!("http://{service}/api/check"))
        .json(&json!({ "url": url }))
        .send()
        .await
        .unwrap();
    let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn direct_file_validates() {
    let upstream = spawn_upstream().await;
    let service = spawn_service().await;

    let url = format!("http://{upstream}/clip.mp4");
    let (status, body) = check(service, &url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true, "{body}");
    assert_eq!(body["directUrl"], url.as_str());
    assert_eq!(body["contentType"], "video/mp4");
}

#[tokio::test]
async fn redirects_are_followed_and_input_url_is_reported() {
    let upstream = spawn_upstream().await;
    let service = spawn_service().await;

    let url = format!("http://{upstream}/old-clip");
    let (_, body) = check(service, &url).await;
    assert_eq!(body["ok"], true, "{body}");
    assert_eq!(body["directUrl"], url.as_str());
    assert_eq!(body["contentType"], "video/mp4");
}

#[tokio::test]
async fn transport_reports_the_final_hop() {
    let upstream = spawn_upstream().await;
    let transport = ReqwestTransport::new(&ProbeConfig::default()).unwrap();

    let response = transport
        .execute(&HttpRequest {
            method: HttpMethod::Head,
            url: format!("http://{upstream}/old-clip"),
            headers: Vec::new(),
        })
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.url, format!("http://{upstream}/clip.mp4"));
    assert_eq!(response.header("content-type").as_deref(), Some("video/mp4"));
}

#[tokio::test]
async fn head_refusal_falls_back_to_ranged_get() {
    let upstream = spawn_upstream().await;
    let service = spawn_service().await;

    let (_, body) = check(service, &format!("http://{upstream}/track.mp3")).await;
    assert_eq!(body["ok"], true, "{body}");
    assert_eq!(body["contentType"], "audio/mpeg");
    assert_eq!(body["contentLength"], "1");
}

#[tokio::test]
async fn html_page_is_rejected() {
    let upstream = spawn_upstream().await;
    let service = spawn_service().await;

    let (status, body) = check(service, &format!("http://{upstream}/page")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "ok": false, "reason": "This looks like HTML, not a direct file." })
    );
}

#[tokio::test]
async fn missing_file_reports_upstream_status() {
    let upstream = spawn_upstream().await;
    let service = spawn_service().await;

    let (_, body) = check(service, &format!("http://{upstream}/gone.mp4")).await;
    assert_eq!(body, json!({ "ok": false, "reason": "Upstream status 410" }));
}

#[tokio::test]
async fn refused_connection_is_a_rejection() {
    let service = spawn_service().await;

    // Bind then drop to get a local port with nothing listening.
    let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = closed.local_addr().unwrap();
    drop(closed);

    let (status, body) = check(service, &format!("http://{addr}/a.mp4")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": false, "reason": "Could not fetch the URL." }));
}

#[tokio::test]
async fn wrong_method_over_the_wire() {
    let service = spawn_service().await;

    let resp = reqwest::Client::new()
        .get(format!("http://{service}/api/check"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 405);
    assert_eq!(
        resp.headers()["content-type"],
        "application/json; charset=utf-8"
    );
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "POST only" }));
}
