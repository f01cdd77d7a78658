//! Response normalization.
//!
//! # Responsibilities
//! - Turn handler return values into the JSON response document
//! - Map errors to a status and the uniform JSON error envelope
//! - Render raw tracebacks as text/plain when traceback mode is on
//!
//! # Design Decisions
//! - Every response of the REST layer is application/json unless
//!   traceback mode is explicitly enabled
//! - Error envelope: {"code": int, "reason": string, "message"?: string}
//! - Messages come only from errors that carry one; unhandled handler
//!   errors never leak their details into the envelope

use std::any::Any;
use std::fmt::Write as _;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::dispatch::RestError;

/// Uniform JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: u16,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(status: StatusCode, message: Option<String>) -> Self {
        Self {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message,
        }
    }
}

/// Normalize a handler return value into the response document.
///
/// Objects pass through, arrays become `{"items": [...]}`, anything else
/// is an internal error.
pub fn into_document(value: Value) -> Result<Value, RestError> {
    match value {
        Value::Object(_) => Ok(value),
        Value::Array(items) => Ok(json!({ "items": items })),
        _ => Err(RestError::InternalError(
            "Response is not a json document".to_string(),
        )),
    }
}

/// Successful response carrying a normalized document.
pub fn document_response(document: Value) -> Response {
    (StatusCode::OK, Json(document)).into_response()
}

/// Error response: JSON envelope, or raw traceback in traceback mode.
pub fn error_response(err: &RestError, serve_traceback: bool) -> Response {
    let status = err.status_code();
    if serve_traceback {
        return traceback_response(status, render_traceback(err));
    }
    let envelope = ErrorEnvelope::new(status, err.client_message().map(str::to_string));
    (status, Json(envelope)).into_response()
}

/// Response for a panic caught while handling a request.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>, serve_traceback: bool) -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    let detail = panic_message(payload.as_ref());
    tracing::error!(panic = %detail, "Handler panicked");

    if serve_traceback {
        return traceback_response(status, format!("panicked: {detail}\n"));
    }
    (status, Json(ErrorEnvelope::new(status, None))).into_response()
}

fn traceback_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

fn render_traceback(err: &RestError) -> String {
    let mut out = format!("Error: {err}\n");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        let _ = writeln!(out, "Caused by: {cause}");
        source = cause.source();
    }
    if let Some(message) = err.client_message() {
        let _ = writeln!(out, "Message: {message}");
    }
    if let Some(trace) = err.backtrace() {
        let _ = write!(out, "\nStack backtrace:\n{trace}");
    }
    out
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
