//! Request spans.
//!
//! # Responsibilities
//! - Create one span per request for `TraceLayer`
//! - Tag it with the request ID so every log line can be correlated

use axum::body::Body;
use axum::http::Request;
use tracing::Span;

use crate::http::request::RequestIdExt;

/// Span for an incoming request.
pub fn request_span(req: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        request_id = %req.request_id().unwrap_or("unknown"),
    )
}
