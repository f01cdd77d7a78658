//! Registration-time errors.

use thiserror::Error;

use crate::api::HttpVerb;

/// A route that can never be served correctly. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A path segment contains braces but is not a single `{identifier}`.
    #[error("Invalid path segment: {segment} (part of {path})")]
    InvalidPathSegment { segment: String, path: String },

    /// Two methods of one class could serve the same verb and path.
    #[error("{resource}: methods `{first}` ({first_path}) and `{second}` ({second_path}) both match {verb} requests")]
    AmbiguousRoute {
        resource: String,
        verb: HttpVerb,
        first: String,
        first_path: String,
        second: String,
        second_path: String,
    },
}
