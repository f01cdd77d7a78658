//! Listener-level pattern matching.
//!
//! # Responsibilities
//! - Match the request path against a route table pattern
//! - Pick the candidate handler class; verb and method are resolved later
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A wildcard stands for exactly one non-empty segment of any length
//! - Empty segments in the request path are ignored
//! - No regex, segment comparison only

use std::fmt;

use axum::body::Body;
use axum::http::Request;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request<Body>) -> bool;
}

/// One segment of a listener pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternSegment {
    Literal(String),
    Wildcard,
}

/// Listener pattern derived from a compiled path, e.g. `/atl/v1/epg/check/*/app/*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerPattern {
    segments: Vec<PatternSegment>,
}

impl ListenerPattern {
    pub fn new(segments: Vec<PatternSegment>) -> Self {
        Self { segments }
    }

    /// Match a raw request path.
    pub fn matches_path(&self, path: &str) -> bool {
        let mut parts = path.split('/').filter(|p| !p.is_empty());
        for segment in &self.segments {
            let Some(part) = parts.next() else {
                return false;
            };
            if let PatternSegment::Literal(literal) = segment {
                if literal != part {
                    return false;
                }
            }
        }
        parts.next().is_none()
    }
}

impl Matcher for ListenerPattern {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.matches_path(req.uri().path())
    }
}

impl fmt::Display for ListenerPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                PatternSegment::Literal(literal) => write!(f, "/{literal}")?,
                PatternSegment::Wildcard => f.write_str("/*")?,
            }
        }
        Ok(())
    }
}
