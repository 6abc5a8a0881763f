//! Request logging with header redaction and request id propagation

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::info;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const REDACTED: &str = "[REDACTED]";

/// Log each request and its outcome, echoing `x-request-id` on the response.
///
/// No span is opened here; `TraceLayer` owns the request span.
pub async fn logging_middleware(mut request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = extract_path(&request);
    let request_id = ensure_request_id(request.headers_mut());

    info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        headers = %redacted_headers(request.headers()).join(", "),
        "Incoming request"
    );

    let mut response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = %request_id,
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

/// Reuse the caller's request id or mint one and attach it to the request
fn ensure_request_id(headers: &mut HeaderMap) -> String {
    if let Some(existing) = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        return existing.to_string();
    }

    let generated = uuid::Uuid::new_v4().to_string();
    if let Ok(value) = HeaderValue::from_str(&generated) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    generated
}

/// `name=value` pairs for every header, with credentials masked
pub fn redacted_headers(headers: &HeaderMap) -> Vec<String> {
    headers
        .iter()
        .map(|(name, value)| {
            let name = name.as_str();
            let value = if is_sensitive_header(name) {
                REDACTED
            } else {
                value.to_str().unwrap_or("[invalid]")
            };

            format!("{}={}", name, value)
        })
        .collect()
}

fn is_sensitive_header(name: &str) -> bool {
    matches!(
        name,
        "authorization"
            | "cookie"
            | "set-cookie"
            | "x-auth-token"
            | "x-csrf-token"
            | "proxy-authorization"
    )
}
