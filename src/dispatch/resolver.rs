//! Method resolution within a matched class.
//!
//! # Responsibilities
//! - Reject verbs the class does not serve (405)
//! - Pick the method whose fixed tokens and arity fit the path (404 otherwise)
//! - Extract positional parameter values
//!
//! # Design Decisions
//! - Synchronous, CPU-only; no suspension points
//! - Fixed tokens must appear in the path as an ordered subsequence
//! - Parameters are positional: every segment that is not a fixed token,
//!   left to right. Placeholder names are never used as keys.
//! - Segments are compared as received (no percent-decoding)

use crate::api::HttpVerb;
use crate::dispatch::error::RestError;
use crate::resource::{Resource, RestMethod};

/// The method selected for a request and its positional arguments.
#[derive(Debug)]
pub struct Resolution<'r> {
    pub method: &'r RestMethod,
    pub params: Vec<String>,
}

/// Non-empty segments of a raw request path.
pub fn path_segments(raw_path: &str) -> Vec<&str> {
    raw_path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Resolve `verb` + `raw_path` to exactly one method of `resource`.
pub fn resolve<'r>(
    resource: &'r Resource,
    verb: HttpVerb,
    raw_path: &str,
) -> Result<Resolution<'r>, RestError> {
    let segments = path_segments(raw_path);

    if !resource.http_verbs().contains(&verb) {
        return Err(RestError::MethodNotAllowed(verb.into()));
    }

    for method in resource.methods() {
        if method.descriptor().http_verb() != verb {
            continue;
        }

        let compiled = method.compiled_path();
        let fixed: Vec<&str> = compiled.fixed_tokens().collect();

        if !is_ordered_subsequence(&fixed, &segments) {
            continue;
        }
        if compiled.placeholder_count() + fixed.len() != segments.len() {
            continue;
        }

        let params = segments
            .iter()
            .filter(|s| !fixed.contains(*s))
            .map(|s| s.to_string())
            .collect();

        return Ok(Resolution { method, params });
    }

    Err(RestError::NotFound(raw_path.to_string()))
}

/// True when every token occurs in `segments`, in the same order.
fn is_ordered_subsequence(tokens: &[&str], segments: &[&str]) -> bool {
    let mut remaining = segments.iter();
    tokens
        .iter()
        .all(|token| remaining.any(|segment| segment == token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Api, MethodDescriptor};
    use crate::resource::{HandlerResult, RequestContext};
    use axum::http::Method;
    use serde_json::json;

    async fn noop(_ctx: RequestContext, _params: Vec<String>) -> HandlerResult {
        Ok(json!({}))
    }

    fn check_handler() -> Resource {
        Resource::builder("CheckHandler", Api::new("atl", "v1").api_class().path("epg"))
            .method(
                MethodDescriptor::builder("test")
                    .name("list")
                    .path("check/{check_id}/app/{id}")
                    .http_method(HttpVerb::Get),
                noop,
            )
            .method(
                MethodDescriptor::builder("get")
                    .path("check/{check_id}")
                    .http_method(HttpVerb::Get),
                noop,
            )
            .method(
                MethodDescriptor::builder("all")
                    .path("check")
                    .http_method(HttpVerb::Get),
                noop,
            )
            .method(MethodDescriptor::builder("create").path("check"), noop)
            .build()
            .unwrap()
    }

    #[test]
    fn test_resolves_by_arity() {
        let resource = check_handler();

        let hit = resolve(&resource, HttpVerb::Get, "/atl/v1/epg/check/42/app/7").unwrap();
        assert_eq!(hit.method.descriptor().name(), "list");
        assert_eq!(hit.params, vec!["42", "7"]);

        let hit = resolve(&resource, HttpVerb::Get, "/atl/v1/epg/check/42").unwrap();
        assert_eq!(hit.method.descriptor().name(), "get");
        assert_eq!(hit.params, vec!["42"]);

        let hit = resolve(&resource, HttpVerb::Get, "/atl/v1/epg/check/").unwrap();
        assert_eq!(hit.method.descriptor().name(), "all");
        assert!(hit.params.is_empty());
    }

    #[test]
    fn test_verb_selects_method() {
        let resource = check_handler();
        let hit = resolve(&resource, HttpVerb::Post, "/atl/v1/epg/check").unwrap();
        assert_eq!(hit.method.descriptor().name(), "create");
    }

    #[test]
    fn test_unknown_verb_is_method_not_allowed() {
        let resource = check_handler();
        let err = resolve(&resource, HttpVerb::Delete, "/atl/v1/epg/check/42").unwrap_err();
        assert!(matches!(err, RestError::MethodNotAllowed(ref m) if m == Method::DELETE));
    }

    #[test]
    fn test_no_structural_match_is_not_found() {
        let resource = check_handler();

        // One segment too many for every template.
        let err = resolve(&resource, HttpVerb::Get, "/atl/v1/epg/check/42/app/7/8").unwrap_err();
        assert!(matches!(err, RestError::NotFound(_)));

        // Fixed token missing.
        let err = resolve(&resource, HttpVerb::Get, "/atl/v1/epg/checks/42").unwrap_err();
        assert!(matches!(err, RestError::NotFound(_)));

        // Known verb, but no method of that verb fits.
        let err = resolve(&resource, HttpVerb::Post, "/atl/v1/epg/check/42").unwrap_err();
        assert!(matches!(err, RestError::NotFound(_)));
    }

    #[test]
    fn test_fixed_tokens_must_keep_order() {
        let resource = check_handler();
        let err = resolve(&resource, HttpVerb::Get, "/atl/v1/epg/app/42/check/7").unwrap_err();
        assert!(matches!(err, RestError::NotFound(_)));
    }

    #[test]
    fn test_ordered_subsequence() {
        assert!(is_ordered_subsequence(&["a", "c"], &["a", "b", "c"]));
        assert!(is_ordered_subsequence(&[], &["a"]));
        assert!(!is_ordered_subsequence(&["c", "a"], &["a", "b", "c"]));
        assert!(!is_ordered_subsequence(&["a", "a"], &["a", "b"]));
    }

    #[test]
    fn test_round_trip_any_placeholder_count() {
        for n in 0..5 {
            let template: Vec<String> = (0..n).map(|i| format!("k{i}/{{p{i}}}")).collect();
            let template = if n == 0 { "root".to_string() } else { template.join("/") };

            let resource = Resource::builder("Generated", Api::new("gen", "v1").api_class())
                .method(
                    MethodDescriptor::builder("target")
                        .path(template.clone())
                        .http_method(HttpVerb::Get),
                    noop,
                )
                .build()
                .unwrap();

            let values: Vec<String> = (0..n).map(|i| format!("value{i}")).collect();
            let mut path = resource.rest_resources_paths()[0].clone();
            for (i, value) in values.iter().enumerate() {
                path = path.replace(&format!("{{p{i}}}"), value);
            }

            let hit = resolve(&resource, HttpVerb::Get, &path).unwrap();
            assert_eq!(hit.method.descriptor().name(), "target");
            assert_eq!(hit.params, values);
        }
    }
}
