//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the REST catch-all handler
//! - Wire up middleware (tracing, request ID, timeout, panic capture)
//! - Resolve the method before reading the body, so 405/404 win over 413
//! - Bind server to listener with graceful shutdown
//! - Dispatch requests to the route table and dispatcher
//! - Record per-request metrics

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::map_response,
    response::Response,
    routing::any,
    Router,
};
use http_body_util::LengthLimitError;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api::HttpVerb;
use crate::config::ServiceConfig;
use crate::dispatch::{invoke, resolve, RestError};
use crate::http::request::{RequestIdExt, X_REQUEST_ID};
use crate::http::response;
use crate::observability::metrics;
use crate::observability::tracing::request_span;
use crate::resource::Resource;
use crate::routing::RouteTable;

/// Application state injected into the REST handler.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub max_body_size: usize,
    pub serve_traceback: bool,
}

/// HTTP service exposing a set of REST resources.
pub struct RestService {
    config: ServiceConfig,
    routes: Arc<RouteTable>,
    handlers: Router,
}

impl RestService {
    /// Build the route table for `resources` (in registration order).
    pub fn new(config: ServiceConfig, resources: impl IntoIterator<Item = Resource>) -> Self {
        let routes = RouteTable::build(resources);
        metrics::record_route_table(routes.entries().len());

        Self {
            config,
            routes: Arc::new(routes),
            handlers: Router::new(),
        }
    }

    /// Serve plain axum routes next to the REST resources.
    ///
    /// Must not claim `/` or a root catch-all; those belong to the REST layer.
    pub fn with_handlers(mut self, handlers: Router) -> Self {
        self.handlers = self.handlers.merge(handlers);
        self
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Build the Axum router with all middleware layers.
    pub fn into_router(self) -> Router {
        let serve_traceback = self.config.debug.serve_traceback;
        let state = AppState {
            routes: self.routes,
            max_body_size: self.config.limits.max_body_size,
            serve_traceback,
        };

        Router::new()
            .route("/", any(rest_handler))
            .route("/{*path}", any(rest_handler))
            .with_state(state)
            .merge(self.handlers)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(self.config.timeouts.request_secs),
            ))
            .layer(map_response(envelope_timeout))
            .layer(CatchPanicLayer::custom(
                move |payload: Box<dyn Any + Send + 'static>| {
                    response::panic_response(payload, serve_traceback)
                },
            ))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes.entries().len(),
            "REST server starting"
        );

        axum::serve(listener, self.into_router())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("REST server stopped");
        Ok(())
    }
}

/// Main REST handler.
/// Looks up the handler class, dispatches, and normalizes the outcome.
async fn rest_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request.request_id().unwrap_or("unknown").to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let resource = state.routes.match_request(&request).cloned();
    let resource_label = resource
        .as_ref()
        .map(|r| r.type_name().to_string())
        .unwrap_or_else(|| "none".to_string());

    let outcome = match resource {
        Some(resource) => handle(&state, &resource, request).await,
        None => Err(RestError::NotFound(path.clone())),
    };

    let response = match outcome {
        Ok(document) => response::document_response(document),
        Err(err) => {
            let status = err.status_code();
            if status.is_server_error() {
                tracing::error!(request_id = %request_id, path = %path, error = %err, "REST request failed");
            } else {
                tracing::warn!(request_id = %request_id, path = %path, status = %status, error = %err, "REST request rejected");
            }
            response::error_response(&err, state.serve_traceback)
        }
    };

    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        &resource_label,
        start_time,
    );
    response
}

async fn handle(
    state: &AppState,
    resource: &Resource,
    request: Request<Body>,
) -> Result<Value, RestError> {
    let verb = HttpVerb::try_from(request.method()).map_err(RestError::MethodNotAllowed)?;
    let resolution = resolve(resource, verb, request.uri().path())?;

    let (parts, body) = request.into_parts();
    let raw_body = axum::body::to_bytes(body, state.max_body_size)
        .await
        .map_err(body_error)?;

    invoke(resolution, parts, raw_body).await
}

fn body_error(err: axum::Error) -> RestError {
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        if cause.is::<LengthLimitError>() {
            return RestError::http(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
        }
        source = cause.source();
    }
    tracing::debug!(error = %err, "Failed to read request body");
    RestError::http(StatusCode::BAD_REQUEST, "Unreadable request body")
}

/// Give responses produced by the timeout layer the JSON error envelope.
async fn envelope_timeout(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(header::CONTENT_TYPE)
    {
        tracing::warn!("REST request timed out");
        return response::error_response(&RestError::status(StatusCode::REQUEST_TIMEOUT), false);
    }
    response
}
