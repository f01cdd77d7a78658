//! Shared handler classes and helpers for integration tests.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use rest_router::api::{Api, HttpVerb, MethodDescriptor};
use rest_router::dispatch::RestError;
use rest_router::resource::{HandlerResult, RequestContext, Resource};

async fn check_list(_ctx: RequestContext, params: Vec<String>) -> HandlerResult {
    match params.as_slice() {
        [check_id, app_id] => Ok(json!({ "hello": check_id, "world": app_id })),
        _ => Err(RestError::BadRequest("Expected check and app ids".into())),
    }
}

async fn create_item(ctx: RequestContext, _params: Vec<String>) -> HandlerResult {
    let item = ctx.body.json().cloned().unwrap_or(Value::Null);
    Ok(json!({ "created": item, "method_id": ctx.method_id }))
}

async fn list_items(_ctx: RequestContext, _params: Vec<String>) -> HandlerResult {
    Ok(json!([{ "id": 1 }, { "id": 2 }]))
}

async fn plain_string(_ctx: RequestContext, _params: Vec<String>) -> HandlerResult {
    Ok(Value::String("just text".into()))
}

async fn unhandled(_ctx: RequestContext, _params: Vec<String>) -> HandlerResult {
    Err(RestError::unhandled(std::io::Error::new(
        std::io::ErrorKind::Other,
        "database offline",
    )))
}

async fn teapot(_ctx: RequestContext, _params: Vec<String>) -> HandlerResult {
    Err(RestError::http(StatusCode::IM_A_TEAPOT, "short and stout"))
}

async fn explode(_ctx: RequestContext, _params: Vec<String>) -> HandlerResult {
    panic!("handler exploded")
}

async fn slow(_ctx: RequestContext, _params: Vec<String>) -> HandlerResult {
    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    Ok(json!({ "done": true }))
}

async fn echo_request_id(ctx: RequestContext, _params: Vec<String>) -> HandlerResult {
    Ok(json!({ "request_id": ctx.request_id() }))
}

/// `GET /atl/v1/epg/check/{check_id}/app/{id}`.
pub fn check_resource(api: &Api) -> Resource {
    Resource::builder("CheckHandler", api.api_class().resource_name("test").path("epg"))
        .method(
            MethodDescriptor::builder("test")
                .name("list")
                .path("check/{check_id}/app/{id}")
                .http_method(HttpVerb::Get),
            check_list,
        )
        .build()
        .unwrap()
}

/// Assorted methods under `/atl/v1/store`.
pub fn store_resource(api: &Api) -> Resource {
    Resource::builder("StoreHandler", api.api_class().resource_name("store").path("store"))
        .method(MethodDescriptor::builder("create").path("items"), create_item)
        .method(
            MethodDescriptor::builder("list")
                .path("items")
                .http_method(HttpVerb::Get),
            list_items,
        )
        .method(
            MethodDescriptor::builder("text")
                .http_method(HttpVerb::Get),
            plain_string,
        )
        .method(
            MethodDescriptor::builder("fail")
                .http_method(HttpVerb::Get),
            unhandled,
        )
        .method(
            MethodDescriptor::builder("teapot")
                .http_method(HttpVerb::Delete),
            teapot,
        )
        .method(
            MethodDescriptor::builder("boom")
                .http_method(HttpVerb::Get),
            explode,
        )
        .method(
            MethodDescriptor::builder("slow")
                .http_method(HttpVerb::Get),
            slow,
        )
        .method(
            MethodDescriptor::builder("whoami")
                .http_method(HttpVerb::Get),
            echo_request_id,
        )
        .build()
        .unwrap()
}

pub fn resources() -> Vec<Resource> {
    let atl = Api::new("atl", "v1");
    vec![check_resource(&atl), store_resource(&atl)]
}

pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Drive one request through the router.
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

pub async fn send_json(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}
