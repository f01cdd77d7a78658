//! Path template compilation.
//!
//! # Responsibilities
//! - Combine API name/version, class base path and method path
//! - Validate placeholder syntax before any request is served
//! - Expose the literal/placeholder structure used by dispatch
//!
//! # Design Decisions
//! - Pure function of the metadata; compiling twice yields equal results
//! - A segment holding `{` or `}` must be exactly `{identifier}`
//! - Empty segments (double slashes) carry no meaning and are skipped

use std::fmt;

use crate::api::{ClassRoutingInfo, MethodDescriptor};
use crate::routing::error::ConfigurationError;
use crate::routing::matcher::{ListenerPattern, PatternSegment};

/// One non-empty segment of a compiled path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must appear verbatim in the request path.
    Literal(String),
    /// `{name}`; matches any single segment. Only the position matters.
    Placeholder(String),
}

/// Fully qualified path template: `/{api_name}/{api_version}/{api_path}{method_path}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPath {
    path: String,
    segments: Vec<Segment>,
}

impl CompiledPath {
    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Literal segments in order (the "fixed endpoint tokens").
    pub fn fixed_tokens(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Literal(token) => Some(token.as_str()),
            Segment::Placeholder(_) => None,
        })
    }

    pub fn placeholder_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Placeholder(_)))
            .count()
    }

    /// Number of segments a matching request path must have.
    pub fn arity(&self) -> usize {
        self.segments.len()
    }

    /// Pattern registered with the listener: placeholders become wildcards.
    pub fn listener_pattern(&self) -> ListenerPattern {
        ListenerPattern::new(
            self.segments
                .iter()
                .map(|s| match s {
                    Segment::Literal(token) => PatternSegment::Literal(token.clone()),
                    Segment::Placeholder(_) => PatternSegment::Wildcard,
                })
                .collect(),
        )
    }

    /// True when some request path is accepted by both templates.
    ///
    /// A path is accepted when it has exactly `arity()` segments and the
    /// fixed tokens occur in it as an ordered subsequence. Both can hold at
    /// once iff the arities agree and the shortest common supersequence of
    /// the two token lists fits in that many segments.
    pub fn overlaps(&self, other: &CompiledPath) -> bool {
        if self.arity() != other.arity() {
            return false;
        }
        let ours: Vec<&str> = self.fixed_tokens().collect();
        let theirs: Vec<&str> = other.fixed_tokens().collect();
        let supersequence = ours.len() + theirs.len() - longest_common_subsequence(&ours, &theirs);
        supersequence <= self.arity()
    }
}

fn longest_common_subsequence(a: &[&str], b: &[&str]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for x in a {
        let mut diagonal = 0;
        for (j, y) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x == y {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

impl fmt::Display for CompiledPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Compile the request path template of `method` within `class_info`.
pub fn compile(
    class_info: &ClassRoutingInfo,
    method: &MethodDescriptor,
) -> Result<CompiledPath, ConfigurationError> {
    let method_path = method.path_template();
    let method_path = method_path.strip_prefix('/').unwrap_or(method_path);

    let api_path = match class_info.base_path() {
        None | Some("") => String::new(),
        Some(base) if base.ends_with('/') => base.to_string(),
        Some(base) => format!("{base}/"),
    };

    let path = format!(
        "/{}/{}/{}{}",
        class_info.name(),
        class_info.version(),
        api_path,
        method_path
    );

    let segments = path
        .split('/')
        .filter(|part| !part.is_empty())
        .map(|part| parse_segment(part, &path))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledPath { path, segments })
}

fn parse_segment(part: &str, path: &str) -> Result<Segment, ConfigurationError> {
    if !part.contains(['{', '}']) {
        return Ok(Segment::Literal(part.to_string()));
    }

    let name = part
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|name| {
            !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        });

    match name {
        Some(name) => Ok(Segment::Placeholder(name.to_string())),
        None => Err(ConfigurationError::InvalidPathSegment {
            segment: part.to_string(),
            path: path.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Api, HttpVerb};

    fn method(path: &str) -> MethodDescriptor {
        MethodDescriptor::builder("test")
            .path(path)
            .http_method(HttpVerb::Get)
            .build()
    }

    #[test]
    fn test_compile_with_base_path() {
        let class_info = Api::new("atl", "v1").api_class().path("epg");
        let compiled = compile(&class_info, &method("check/{check_id}/app/{id}")).unwrap();

        assert_eq!(compiled.as_str(), "/atl/v1/epg/check/{check_id}/app/{id}");
        assert_eq!(
            compiled.fixed_tokens().collect::<Vec<_>>(),
            vec!["atl", "v1", "epg", "check", "app"]
        );
        assert_eq!(compiled.placeholder_count(), 2);
        assert_eq!(compiled.arity(), 7);
    }

    #[test]
    fn test_compile_path_normalization() {
        let api = Api::new("atl", "v1");

        let bare = compile(&api.api_class(), &method("/status")).unwrap();
        assert_eq!(bare.as_str(), "/atl/v1/status");

        let slashed = compile(&api.api_class().path("epg/"), &method("status")).unwrap();
        assert_eq!(slashed.as_str(), "/atl/v1/epg/status");

        let empty = compile(&api.api_class().path(""), &method("status")).unwrap();
        assert_eq!(empty.as_str(), "/atl/v1/status");
    }

    #[test]
    fn test_default_path_is_method_name() {
        let class_info = Api::new("atl", "v1").api_class();
        let descriptor = MethodDescriptor::builder("_Ping").build();
        let compiled = compile(&class_info, &descriptor).unwrap();
        assert_eq!(compiled.as_str(), "/atl/v1/ping");
    }

    #[test]
    fn test_malformed_segments_rejected() {
        let class_info = Api::new("atl", "v1").api_class().path("epg");

        for bad in [
            "check/{check_id/app/{id}",
            "check/{}",
            "check/id}",
            "check/x{id}",
            "check/{id}x",
            "check/{a-b}",
            "check/{{id}}",
        ] {
            let err = compile(&class_info, &method(bad)).unwrap_err();
            assert!(
                matches!(err, ConfigurationError::InvalidPathSegment { .. }),
                "{bad} should be rejected"
            );
        }

        let err = compile(&class_info, &method("check/{check_id/app/{id}")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid path segment: {check_id (part of /atl/v1/epg/check/{check_id/app/{id})"
        );
    }

    #[test]
    fn test_compile_is_idempotent() {
        let class_info = Api::new("atl", "v1").api_class().path("epg");
        let descriptor = method("check/{check_id}");
        assert_eq!(
            compile(&class_info, &descriptor).unwrap(),
            compile(&class_info, &descriptor).unwrap()
        );
    }

    #[test]
    fn test_segments() {
        let class_info = Api::new("atl", "v1").api_class();
        let compiled = compile(&class_info, &method("users/{id}")).unwrap();
        assert_eq!(
            compiled.segments(),
            &[
                Segment::Literal("atl".into()),
                Segment::Literal("v1".into()),
                Segment::Literal("users".into()),
                Segment::Placeholder("id".into()),
            ]
        );
    }

    #[test]
    fn test_overlaps() {
        let class_info = Api::new("atl", "v1").api_class();
        let path = |template| compile(&class_info, &method(template)).unwrap();

        assert!(path("users/{id}").overlaps(&path("users/me")));
        assert!(path("users/{id}").overlaps(&path("users/{name}")));
        assert!(path("a/{x}/{y}").overlaps(&path("a/b/{y}")));
        // `/a/b/a` satisfies both token orders.
        assert!(path("a/b/{x}").overlaps(&path("{y}/a/b")));

        assert!(!path("users/me").overlaps(&path("users/all")));
        assert!(!path("users/{id}").overlaps(&path("users/{id}/roles")));
        assert!(!path("a/b/{x}").overlaps(&path("c/d/{x}")));
    }

    #[test]
    fn test_listener_pattern() {
        let class_info = Api::new("atl", "v1").api_class().path("epg");
        let compiled = compile(&class_info, &method("check/{check_id}/app/{id}")).unwrap();
        assert_eq!(
            compiled.listener_pattern().to_string(),
            "/atl/v1/epg/check/*/app/*"
        );
    }
}
