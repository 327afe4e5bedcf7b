//! HTTP front end for the direct-link validator.
//!
//! One route, `/api/check`, gates on the method itself so that every
//! response (405 included) carries the same CORS headers. `OPTIONS` is
//! answered with 204 before anything else is looked at.

pub mod config;
pub mod logging;
pub mod transport;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use linkprobe_core::{ClientError, ProbeTransport, Validator};
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::debug;

use config::{ConfigError, ServerConfig};
use transport::ReqwestTransport;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Largest `POST` body read; anything bigger is answered as `Invalid JSON`.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
];

/// Shared, read-only request context.
#[derive(Clone)]
pub struct AppState {
    validator: Arc<Validator>,
    transport: Arc<dyn ProbeTransport>,
}

impl AppState {
    pub fn new(validator: Validator, transport: Arc<dyn ProbeTransport>) -> Self {
        Self {
            validator: Arc::new(validator),
            transport,
        }
    }

    /// Validator and reqwest transport as described by `config`.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(&config.probe)?;
        Ok(Self::new(config.validator()?, Arc::new(transport)))
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn transport(&self) -> &dyn ProbeTransport {
        self.transport.as_ref()
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/check", any(check_url))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

/// A `ClientError` rendered as `{ "error": ... }` with its 4xx status.
pub struct ApiError(pub ClientError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::BAD_REQUEST);
        json_response(status, json!({ "error": self.0.to_string() }))
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        CORS_HEADERS,
        [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
        Json(body),
    )
        .into_response()
}

// The body is read only after the method check, so OPTIONS and 405 answers
// never depend on what was sent.
async fn check_url(State(state): State<AppState>, method: Method, body: Body) -> Response {
    if method == Method::OPTIONS {
        return (StatusCode::NO_CONTENT, CORS_HEADERS).into_response();
    }
    if method != Method::POST {
        return ApiError(ClientError::MethodNotAllowed).into_response();
    }

    let body = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(error = %err, "failed to read request body");
            return ApiError(ClientError::InvalidJson).into_response();
        }
    };

    match state.validator.check(&body, state.transport()).await {
        Ok(verdict) => json_response(StatusCode::OK, verdict),
        Err(err) => {
            debug!(error = %err, "rejected malformed request");
            ApiError(err).into_response()
        }
    }
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
