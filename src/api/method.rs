//! Per-method routing metadata.

use std::fmt;

use axum::http::Method;
use serde::{Deserialize, Serialize};

use crate::api::descriptor::{AuthLevel, ClassRoutingInfo};

/// Content type assumed when a method does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// HTTP verbs a REST method can be bound to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    #[default]
    Post,
    Put,
    Delete,
}

impl HttpVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
        }
    }

    /// Whether requests with this verb carry a body worth decoding.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpVerb::Post | HttpVerb::Put)
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl From<HttpVerb> for Method {
    fn from(verb: HttpVerb) -> Self {
        match verb {
            HttpVerb::Get => Method::GET,
            HttpVerb::Post => Method::POST,
            HttpVerb::Put => Method::PUT,
            HttpVerb::Delete => Method::DELETE,
        }
    }
}

impl TryFrom<&Method> for HttpVerb {
    type Error = Method;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        match *method {
            Method::GET => Ok(HttpVerb::Get),
            Method::POST => Ok(HttpVerb::Post),
            Method::PUT => Ok(HttpVerb::Put),
            Method::DELETE => Ok(HttpVerb::Delete),
            _ => Err(method.clone()),
        }
    }
}

/// Routing metadata of one handler method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    name: String,
    path_template: String,
    http_verb: HttpVerb,
    content_type: String,
    auth_level: Option<AuthLevel>,
}

impl MethodDescriptor {
    /// Start describing the handler method identified by `ident`.
    pub fn builder(ident: impl Into<String>) -> MethodDescriptorBuilder {
        MethodDescriptorBuilder {
            ident: ident.into(),
            name: None,
            path: None,
            http_verb: None,
            content_type: None,
            auth_level: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw path template, relative to the API and class base paths.
    pub fn path_template(&self) -> &str {
        &self.path_template
    }

    pub fn http_verb(&self) -> HttpVerb {
        self.http_verb
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn auth_level(&self) -> Option<AuthLevel> {
        self.auth_level
    }

    /// True when the request body must be decoded as JSON before invocation.
    pub fn expects_json_body(&self) -> bool {
        self.http_verb.has_body() && self.content_type == DEFAULT_CONTENT_TYPE
    }

    /// Dotted identifier: `<api>[.<resource>].<method>`, each part sanitized.
    pub fn method_id(&self, class_info: &ClassRoutingInfo) -> String {
        let mut id = safe_name(class_info.name());
        if let Some(resource) = class_info.resource().filter(|r| !r.is_empty()) {
            id.push('.');
            id.push_str(&safe_name(resource));
        }
        id.push('.');
        id.push_str(&safe_name(&self.name));
        id
    }
}

/// Builder for [`MethodDescriptor`].
#[derive(Debug, Clone)]
pub struct MethodDescriptorBuilder {
    ident: String,
    name: Option<String>,
    path: Option<String>,
    http_verb: Option<HttpVerb>,
    content_type: Option<String>,
    auth_level: Option<AuthLevel>,
}

impl MethodDescriptorBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn http_method(mut self, verb: HttpVerb) -> Self {
        self.http_verb = Some(verb);
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn auth_level(mut self, auth_level: AuthLevel) -> Self {
        self.auth_level = Some(auth_level);
        self
    }

    pub fn build(self) -> MethodDescriptor {
        let name = self
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| safe_name(&self.ident));
        let path_template = self
            .path
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| name.clone());

        MethodDescriptor {
            name,
            path_template,
            http_verb: self.http_verb.unwrap_or_default(),
            content_type: self
                .content_type
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            auth_level: self.auth_level,
        }
    }
}

impl From<MethodDescriptorBuilder> for MethodDescriptor {
    fn from(builder: MethodDescriptorBuilder) -> Self {
        builder.build()
    }
}

/// Restrict a name to `[A-Za-z0-9_.]`, strip leading underscores and
/// lower-case the first character.
pub fn safe_name(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
        .collect();
    let trimmed = kept.trim_start_matches('_');

    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Api;

    #[test]
    fn test_safe_name() {
        assert_eq!(safe_name("__GetItem"), "getItem");
        assert_eq!(safe_name("list-all items!"), "listallitems");
        assert_eq!(safe_name("v1.Shelves"), "v1.Shelves");
        assert_eq!(safe_name("___"), "");
    }

    #[test]
    fn test_builder_defaults() {
        let method = MethodDescriptor::builder("_Insert").build();
        assert_eq!(method.name(), "insert");
        assert_eq!(method.path_template(), "insert");
        assert_eq!(method.http_verb(), HttpVerb::Post);
        assert_eq!(method.content_type(), DEFAULT_CONTENT_TYPE);
        assert!(method.expects_json_body());
    }

    #[test]
    fn test_builder_overrides() {
        let method = MethodDescriptor::builder("test")
            .name("list")
            .path("check/{check_id}/app/{id}")
            .http_method(HttpVerb::Get)
            .content_type("text/plain")
            .build();
        assert_eq!(method.name(), "list");
        assert_eq!(method.path_template(), "check/{check_id}/app/{id}");
        assert_eq!(method.http_verb(), HttpVerb::Get);
        assert!(!method.expects_json_body());
    }

    #[test]
    fn test_method_id() {
        let api = Api::new("Atl", "v1");
        let method = MethodDescriptor::builder("test").name("List").build();

        assert_eq!(method.method_id(&api.api_class()), "atl.list");
        assert_eq!(
            method.method_id(&api.api_class().resource_name("_Checks")),
            "atl.checks.list"
        );
    }

    #[test]
    fn test_verb_from_http_method() {
        assert_eq!(HttpVerb::try_from(&Method::GET), Ok(HttpVerb::Get));
        assert_eq!(HttpVerb::try_from(&Method::DELETE), Ok(HttpVerb::Delete));
        assert_eq!(HttpVerb::try_from(&Method::PATCH), Err(Method::PATCH));
    }
}
