//! Declarative REST routing on top of Axum.
//!
//! Handler classes are described by an [`api::Api`], a
//! [`api::ClassRoutingInfo`] and one [`api::MethodDescriptor`] per REST
//! method. [`resource::Resource`] compiles those descriptors into path
//! patterns, [`routing::RouteTable`] turns them into listener patterns,
//! and [`dispatch`] selects the method for each request and normalizes
//! whatever it returns into a JSON document.

pub mod api;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resource;
pub mod routing;

pub use api::{Api, AuthLevel, ClassRoutingInfo, HttpVerb, MethodDescriptor};
pub use config::ServiceConfig;
pub use dispatch::RestError;
pub use http::RestService;
pub use lifecycle::Shutdown;
pub use resource::{RequestContext, Resource};
pub use routing::{ConfigurationError, RouteTable};
