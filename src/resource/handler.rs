//! Handler invocation types.

use std::future::Future;

use axum::body::Bytes;
use axum::http::{request::Parts, HeaderMap, Method, Uri};
use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::dispatch::RestError;
use crate::http::request::RequestIdExt;

/// What a handler returns: a JSON document, or the error to report.
pub type HandlerResult = Result<Value, RestError>;

pub type HandlerFuture = BoxFuture<'static, HandlerResult>;

/// A REST method implementation.
///
/// Receives the request context first, then the path parameter values in
/// the order they appear in the path.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: RequestContext, params: Vec<String>) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, ctx: RequestContext, params: Vec<String>) -> HandlerFuture {
        Box::pin(self(ctx, params))
    }
}

/// Request body as seen by the handler.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Decoded because the method is POST/PUT with a JSON content type.
    Json(Value),
    /// Passed through untouched.
    Raw(Bytes),
}

impl RequestBody {
    pub fn json(&self) -> Option<&Value> {
        match self {
            RequestBody::Json(value) => Some(value),
            RequestBody::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&Bytes> {
        match self {
            RequestBody::Json(_) => None,
            RequestBody::Raw(bytes) => Some(bytes),
        }
    }
}

/// Framework-supplied first argument of every handler.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: RequestBody,
    /// Dotted id of the method being invoked, e.g. `atl.test.list`.
    pub method_id: String,
}

impl RequestContext {
    pub(crate) fn new(parts: Parts, body: RequestBody, method_id: String) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            method_id,
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        self.headers.request_id()
    }
}
