//! Request identification.
//!
//! # Responsibilities
//! - Name the request ID header shared by every layer
//! - Read the request ID back from a request or its headers
//!
//! # Design Decisions
//! - IDs are generated by `tower_http::request_id` (UUID v4) as the
//!   outermost layer, so tracing spans and handlers all see the same ID
//! - The ID is propagated to the response unchanged

use axum::http::{HeaderMap, HeaderName, Request};

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Access to the request ID.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl RequestIdExt for HeaderMap {
    fn request_id(&self) -> Option<&str> {
        self.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
    }
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> Option<&str> {
        self.headers().request_id()
    }
}
