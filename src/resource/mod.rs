//! Handler classes.
//!
//! # Data Flow
//! ```text
//! Resource::builder(type_name, class_info)
//!     → .method(descriptor, handler)   (one per REST method)
//!     → .build()                       (compile paths, reject ambiguity)
//!     → Resource (immutable, shared via Arc by the route table)
//! ```
//!
//! # Design Decisions
//! - Registration is explicit; nothing is discovered per request
//! - Malformed or ambiguous routes fail `build()`, never a request
//! - Two methods of one verb are ambiguous when any request path could
//!   satisfy both templates (`CompiledPath::overlaps`), so at most one
//!   method ever matches and registration order never decides dispatch

pub mod handler;

use std::fmt;
use std::sync::Arc;

use crate::api::{ClassRoutingInfo, HttpVerb, MethodDescriptor};
use crate::routing::error::ConfigurationError;
use crate::routing::template::{compile, CompiledPath};

pub use handler::{Handler, HandlerFuture, HandlerResult, RequestBody, RequestContext};

/// One registered REST method: metadata, compiled path and implementation.
pub struct RestMethod {
    descriptor: MethodDescriptor,
    compiled: CompiledPath,
    method_id: String,
    handler: Arc<dyn Handler>,
}

impl RestMethod {
    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    pub fn compiled_path(&self) -> &CompiledPath {
        &self.compiled
    }

    pub fn method_id(&self) -> &str {
        &self.method_id
    }

    pub(crate) fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }
}

impl fmt::Debug for RestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestMethod")
            .field("method_id", &self.method_id)
            .field("verb", &self.descriptor.http_verb())
            .field("path", &self.compiled.as_str())
            .finish_non_exhaustive()
    }
}

/// A handler class: the REST methods sharing one class routing info.
#[derive(Debug)]
pub struct Resource {
    type_name: String,
    class_info: ClassRoutingInfo,
    methods: Vec<RestMethod>,
}

impl Resource {
    pub fn builder(type_name: impl Into<String>, class_info: ClassRoutingInfo) -> ResourceBuilder {
        ResourceBuilder {
            type_name: type_name.into(),
            class_info,
            methods: Vec::new(),
        }
    }

    /// Name used in logs, metrics and error messages.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn class_info(&self) -> &ClassRoutingInfo {
        &self.class_info
    }

    pub fn methods(&self) -> &[RestMethod] {
        &self.methods
    }

    /// Distinct verbs served by this class.
    pub fn http_verbs(&self) -> Vec<HttpVerb> {
        let mut verbs: Vec<HttpVerb> = Vec::new();
        for method in &self.methods {
            let verb = method.descriptor.http_verb();
            if !verbs.contains(&verb) {
                verbs.push(verb);
            }
        }
        verbs
    }

    /// Fully qualified path templates of every method, in registration order.
    pub fn rest_resources_paths(&self) -> Vec<String> {
        self.methods
            .iter()
            .map(|m| m.compiled.as_str().to_string())
            .collect()
    }
}

/// Builder for [`Resource`].
pub struct ResourceBuilder {
    type_name: String,
    class_info: ClassRoutingInfo,
    methods: Vec<(MethodDescriptor, Arc<dyn Handler>)>,
}

impl ResourceBuilder {
    /// Register a REST method.
    pub fn method<H: Handler>(mut self, descriptor: impl Into<MethodDescriptor>, handler: H) -> Self {
        self.methods.push((descriptor.into(), Arc::new(handler)));
        self
    }

    /// Compile every method path and check the class for ambiguous routes.
    pub fn build(self) -> Result<Resource, ConfigurationError> {
        let mut methods: Vec<RestMethod> = Vec::with_capacity(self.methods.len());

        for (descriptor, handler) in self.methods {
            let compiled = compile(&self.class_info, &descriptor)?;
            let method_id = descriptor.method_id(&self.class_info);

            let clash = methods.iter().find(|m| {
                m.descriptor.http_verb() == descriptor.http_verb() && m.compiled.overlaps(&compiled)
            });
            if let Some(first) = clash {
                return Err(ConfigurationError::AmbiguousRoute {
                    resource: self.type_name,
                    verb: descriptor.http_verb(),
                    first: first.descriptor.name().to_string(),
                    first_path: first.compiled.to_string(),
                    second: descriptor.name().to_string(),
                    second_path: compiled.to_string(),
                });
            }

            tracing::debug!(
                resource = %self.type_name,
                method_id = %method_id,
                verb = %descriptor.http_verb(),
                path = %compiled,
                "REST method compiled"
            );

            methods.push(RestMethod {
                descriptor,
                compiled,
                method_id,
                handler,
            });
        }

        Ok(Resource {
            type_name: self.type_name,
            class_info: self.class_info,
            methods,
        })
    }
}
