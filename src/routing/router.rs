//! Route table construction and lookup.
//!
//! # Responsibilities
//! - Turn each handler class into listener route entries
//! - Look up the candidate class for a request path
//! - Return matched class or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - One entry per distinct path of a class; verbs sharing a path collapse
//! - Registration order is precedence: first matching entry wins
//! - Overlaps between classes are not detected at this level

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;

use crate::api::Api;
use crate::resource::Resource;
use crate::routing::matcher::{ListenerPattern, Matcher};

/// One listener registration: a pattern and the class serving it.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub pattern: ListenerPattern,
    pub resource: Arc<Resource>,
}

/// Compiled routes of every registered handler class.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    resources: Vec<Arc<Resource>>,
}

impl RouteTable {
    /// Build the table from handler classes, in registration order.
    pub fn build(resources: impl IntoIterator<Item = Resource>) -> Self {
        let mut table = Self::default();
        for resource in resources {
            let resource = Arc::new(resource);
            table.entries.extend(Self::route_entries(&resource));
            table.resources.push(resource);
        }

        for entry in &table.entries {
            tracing::info!(
                pattern = %entry.pattern,
                resource = %entry.resource.type_name(),
                "Route registered"
            );
        }
        tracing::info!(
            routes = table.entries.len(),
            resources = table.resources.len(),
            "Route table built"
        );
        table
    }

    /// Listener entries for one class, one per distinct method path.
    pub fn route_entries(resource: &Arc<Resource>) -> Vec<RouteEntry> {
        let mut entries: Vec<RouteEntry> = Vec::new();
        for method in resource.methods() {
            let pattern = method.compiled_path().listener_pattern();
            if entries.iter().any(|e| e.pattern == pattern) {
                continue;
            }
            entries.push(RouteEntry {
                pattern,
                resource: resource.clone(),
            });
        }
        entries
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn resources(&self) -> &[Arc<Resource>] {
        &self.resources
    }

    /// Classes implementing `api` (same handle, not merely equal name/version).
    pub fn resources_for(&self, api: &Api) -> Vec<&Arc<Resource>> {
        self.resources
            .iter()
            .filter(|r| r.class_info().api().is_same_api(api))
            .collect()
    }

    /// First class whose pattern matches `path`.
    pub fn match_path(&self, path: &str) -> Option<&Arc<Resource>> {
        self.entries
            .iter()
            .find(|e| e.pattern.matches_path(path))
            .map(|e| &e.resource)
    }

    /// First class whose pattern matches the request.
    pub fn match_request(&self, req: &Request<Body>) -> Option<&Arc<Resource>> {
        self.entries
            .iter()
            .find(|e| e.pattern.matches(req))
            .map(|e| &e.resource)
    }
}
