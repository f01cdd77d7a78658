//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Matched Resource + verb + request parts + raw body
//!     → resolver.rs (verb check, method selection, positional params)
//!     → invoke (the HTTP layer reads the body only after resolution)
//!     → decode body (JSON for POST/PUT with application/json)
//!     → Handler::call(ctx, params)
//!     → http::response::into_document (object, or {"items": [...]})
//! ```
//!
//! # Design Decisions
//! - Every failure is terminal for its request and maps to one status
//! - Nothing here touches shared mutable state
//! - Only body decoding and the handler itself may suspend

pub mod error;
pub mod resolver;

use axum::body::Bytes;
use axum::http::request::Parts;
use serde_json::Value;

use crate::api::{HttpVerb, MethodDescriptor};
use crate::http::response::into_document;
use crate::resource::{RequestBody, RequestContext, Resource};

pub use error::RestError;
pub use resolver::{resolve, Resolution};

/// Dispatch one request to the matching method of `resource`.
///
/// Returns the normalized JSON document to send back.
pub async fn dispatch(
    resource: &Resource,
    verb: HttpVerb,
    parts: Parts,
    raw_body: Bytes,
) -> Result<Value, RestError> {
    let resolution = resolve(resource, verb, parts.uri.path())?;
    invoke(resolution, parts, raw_body).await
}

/// Run an already resolved method: decode the body, call the handler and
/// normalize its result.
pub async fn invoke(
    resolution: Resolution<'_>,
    parts: Parts,
    raw_body: Bytes,
) -> Result<Value, RestError> {
    let Resolution { method, params } = resolution;
    let body = decode_body(method.descriptor(), raw_body)?;

    tracing::debug!(
        method_id = %method.method_id(),
        params = ?params,
        "Dispatching REST method"
    );

    let ctx = RequestContext::new(parts, body, method.method_id().to_string());
    let value = method.handler().call(ctx, params).await?;
    into_document(value)
}

fn decode_body(descriptor: &MethodDescriptor, raw_body: Bytes) -> Result<RequestBody, RestError> {
    if !descriptor.expects_json_body() {
        return Ok(RequestBody::Raw(raw_body));
    }
    serde_json::from_slice(&raw_body)
        .map(RequestBody::Json)
        .map_err(|_| RestError::BadRequest("Invalid JSON".to_string()))
}
