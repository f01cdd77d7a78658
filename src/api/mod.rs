//! Routing metadata subsystem.
//!
//! # Data Flow
//! ```text
//! Api::new(name, version)          (shared, compared by identity)
//!     → api.api_class()            (ClassRoutingInfo: resource name, base path)
//!     → MethodDescriptor::builder  (verb, path template, content type)
//!     → routing::template::compile (fully qualified path template)
//! ```
//!
//! # Design Decisions
//! - Everything here is built once at startup and read-only afterwards
//! - Two classes implement the same API only if they hold the same `Api` handle
//! - No per-request introspection: descriptors are plain values

pub mod descriptor;
pub mod method;

pub use descriptor::{Api, AuthLevel, ClassRoutingInfo};
pub use method::{HttpVerb, MethodDescriptor, MethodDescriptorBuilder, DEFAULT_CONTENT_TYPE};
