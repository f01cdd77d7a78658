//! API and per-class routing metadata.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Frontend authentication level.
///
/// Carried through the metadata so tooling can read it; the dispatcher
/// never enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthLevel {
    /// Valid authentication credentials are required.
    Required,
    /// Authentication is optional; invalid credentials are rejected.
    Optional,
    /// Authentication is optional; invalid credentials are ignored.
    OptionalContinue,
    /// Authentication is not required.
    None,
}

#[derive(Debug)]
struct ApiCommon {
    name: String,
    version: String,
    auth_level: Option<AuthLevel>,
}

/// Shared descriptor of one logical API surface.
///
/// Cloning an `Api` clones the handle, not the descriptor. Every class
/// registered through clones of the same handle implements the same API;
/// two handles created separately never do, even with equal name and
/// version.
#[derive(Debug, Clone)]
pub struct Api {
    common: Arc<ApiCommon>,
}

impl Api {
    /// Create a new API descriptor.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::build(name.into(), version.into(), None)
    }

    /// Create a new API descriptor with a default authentication level.
    pub fn with_auth_level(
        name: impl Into<String>,
        version: impl Into<String>,
        auth_level: AuthLevel,
    ) -> Self {
        Self::build(name.into(), version.into(), Some(auth_level))
    }

    fn build(name: String, version: String, auth_level: Option<AuthLevel>) -> Self {
        Self {
            common: Arc::new(ApiCommon {
                name,
                version,
                auth_level,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.common.name
    }

    pub fn version(&self) -> &str {
        &self.common.version
    }

    /// Default authentication level for every class of this API.
    pub fn auth_level(&self) -> Option<AuthLevel> {
        self.common.auth_level
    }

    /// Identity comparison: true only for handles to the same descriptor.
    pub fn is_same_api(&self, other: &Api) -> bool {
        Arc::ptr_eq(&self.common, &other.common)
    }

    /// Start describing a class that implements (part of) this API.
    pub fn api_class(&self) -> ClassRoutingInfo {
        ClassRoutingInfo {
            api: self.clone(),
            resource_name: None,
            path: None,
            auth_level: None,
        }
    }
}

/// Routing metadata attached to one handler class.
#[derive(Debug, Clone)]
pub struct ClassRoutingInfo {
    api: Api,
    resource_name: Option<String>,
    path: Option<String>,
    auth_level: Option<AuthLevel>,
}

impl ClassRoutingInfo {
    /// Collection this class implements within the API.
    pub fn resource_name(mut self, resource_name: impl Into<String>) -> Self {
        self.resource_name = Some(resource_name.into());
        self
    }

    /// Base path prepended to every method path of this class.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Override the API's default authentication level for this class.
    pub fn auth_level(mut self, auth_level: AuthLevel) -> Self {
        self.auth_level = Some(auth_level);
        self
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn name(&self) -> &str {
        self.api.name()
    }

    pub fn version(&self) -> &str {
        self.api.version()
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource_name.as_deref()
    }

    pub fn base_path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Class override if present, else the API default.
    pub fn resolved_auth_level(&self) -> Option<AuthLevel> {
        self.auth_level.or(self.api.auth_level())
    }

    /// True when both classes hold the same `Api` handle.
    pub fn is_same_api(&self, other: &ClassRoutingInfo) -> bool {
        self.api.is_same_api(&other.api)
    }
}
