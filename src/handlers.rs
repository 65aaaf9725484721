// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the submission intake service.
//!
//! Bodies are decoded leniently: anything that cannot be read as a form or
//! JSON object becomes an empty payload and is rejected by the validator.

use crate::config::Config;
use crate::pipeline::{ClientMeta, IntakePipeline, SubmitPayload};
use axum::{
    body::Body,
    extract::{ConnectInfo, DefaultBodyLimit, FromRequest, State},
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug, error};

/// Shared application state.
pub struct AppState {
    pub pipeline: IntakePipeline,
    pub config: Config,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

/// Accepted submission response body.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub status: &'static str,
    pub id: u64,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Form-encoded submission body.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "submission-intake",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Accept a text submission.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    request: Request<Body>,
) -> Response {
    let client = ClientMeta {
        forwarded_for: header_str(&headers, "x-forwarded-for"),
        peer: connect_info.map(|ConnectInfo(addr)| addr.ip().to_canonical().to_string()),
        user_agent: header_str(&headers, header::USER_AGENT.as_str()),
    };

    let payload = match read_payload(request).await {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    match state.pipeline.submit(&client, &payload).await {
        Ok(receipt) => (
            StatusCode::CREATED,
            [
                ("X-RateLimit-Limit", state.pipeline.gate().limit().to_string()),
                ("X-RateLimit-Remaining", receipt.remaining.to_string()),
            ],
            Json(SubmitResponse {
                status: "ok",
                id: receipt.id,
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// Latest submissions, newest first.
pub async fn admin_list(State(state): State<Arc<AppState>>) -> Response {
    if !state.config.admin.list_enabled {
        return api_not_found().await.into_response();
    }

    match state.pipeline.list_latest(state.config.admin.list_limit).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list submissions");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Storage error".to_string(),
                    code: "STORE_FAILURE",
                    retry_after_secs: None,
                }),
            )
                .into_response()
        }
    }
}

/// Prometheus text exposition.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.pipeline.metrics().render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Unknown API route.
pub async fn api_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
            code: "NOT_FOUND",
            retry_after_secs: None,
        }),
    )
}

/// Static front-end assets.
///
/// Lookup order: the exact file (or a directory's `index.html`), then the
/// path with `.html` and `.htm` appended, then the root `index.html` so
/// client-side routes load the app. Without a static directory every
/// unmatched route is a JSON 404.
pub async fn static_fallback(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    let Some(dir) = state.config.static_dir.as_deref() else {
        return api_not_found().await.into_response();
    };

    let method = request.method().clone();
    let headers = request.headers().clone();
    let path = request.uri().path().to_owned();

    let response = serve(ServeDir::new(dir).append_index_html_on_directories(true), request).await;
    if response.status() != StatusCode::NOT_FOUND {
        return response;
    }

    for candidate in extension_candidates(&path) {
        let Some(request) = static_request(&method, &headers, &candidate) else {
            continue;
        };
        let response = serve(ServeDir::new(dir), request).await;
        if response.status() != StatusCode::NOT_FOUND {
            return response;
        }
    }

    match static_request(&method, &headers, "/") {
        Some(request) => serve(ServeFile::new(Path::new(dir).join("index.html")), request).await,
        None => api_not_found().await.into_response(),
    }
}

async fn serve<S, B>(service: S, request: Request<Body>) -> Response
where
    S: tower::Service<Request<Body>, Response = axum::http::Response<B>, Error = Infallible>,
    axum::http::Response<B>: IntoResponse,
{
    match service.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// `/about` → `/about.html`, `/about.htm`. Paths ending in `/` or whose last
/// segment already has an extension get none.
fn extension_candidates(path: &str) -> Vec<String> {
    let last = path.rsplit('/').next().unwrap_or_default();
    if last.is_empty() || last.contains('.') {
        return Vec::new();
    }
    ["html", "htm"]
        .iter()
        .map(|ext| format!("{}.{}", path, ext))
        .collect()
}

fn static_request(method: &Method, headers: &HeaderMap, path: &str) -> Option<Request<Body>> {
    let mut request = Request::builder()
        .method(method.clone())
        .uri(path)
        .body(Body::empty())
        .ok()?;
    *request.headers_mut() = headers.clone();
    Some(request)
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let config = state.config.clone();

    let api = Router::new()
        .route("/submit", post(submit))
        .route("/admin/list", get(admin_list))
        .fallback(api_not_found);

    let mut app = Router::new()
        .nest("/api", api)
        .route("/health", get(health))
        .route("/healthz", get(health));

    if config.metrics.enabled {
        app = app.route(&config.metrics.path, get(metrics));
    }

    app.fallback(static_fallback)
        .layer(DefaultBodyLimit::max(config.intake.body_limit_bytes))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Header value as text. Bytes that are not valid UTF-8 are replaced.
fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

/// Decode the submission body. Only an oversized body is an error.
async fn read_payload(request: Request<Body>) -> Result<SubmitPayload, Response> {
    if is_json(request.headers()) {
        match Json::<serde_json::Value>::from_request(request, &()).await {
            Ok(Json(value)) => Ok(SubmitPayload {
                text: json_string(&value, "text"),
                lang: json_string(&value, "lang"),
            }),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Err(rejection.into_response())
            }
            Err(rejection) => {
                debug!(error = %rejection.body_text(), "Unreadable JSON body");
                Ok(SubmitPayload::default())
            }
        }
    } else {
        match Form::<SubmitForm>::from_request(request, &()).await {
            Ok(Form(form)) => Ok(SubmitPayload {
                text: form.text,
                lang: form.lang,
            }),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Err(rejection.into_response())
            }
            Err(rejection) => {
                debug!(error = %rejection.body_text(), "Unreadable form body");
                Ok(SubmitPayload::default())
            }
        }
    }
}

fn json_string(value: &serde_json::Value, field: &str) -> Option<String> {
    value.get(field).and_then(|v| v.as_str()).map(str::to_owned)
}
