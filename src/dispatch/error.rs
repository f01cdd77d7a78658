//! Per-request errors and their HTTP mapping.

use std::backtrace::Backtrace;
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that end a single request. Never retried.
#[derive(Debug, Error)]
pub enum RestError {
    /// Verb not served by any method of the matched class.
    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),

    /// No method template matches the path structure.
    #[error("no REST method matches {0}")]
    NotFound(String),

    /// Request body rejected (e.g. not JSON when JSON is required).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The framework could not produce a response document.
    #[error("internal error: {0}")]
    InternalError(String),

    /// HTTP error raised on purpose, usually by a handler.
    #[error("HTTP {status}")]
    Http {
        status: StatusCode,
        message: Option<String>,
    },

    /// Any other failure inside a handler.
    #[error("unhandled handler error: {source}")]
    Unhandled {
        source: BoxError,
        trace: Arc<Backtrace>,
    },
}

impl RestError {
    /// HTTP error with an explicit status and message.
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        RestError::Http {
            status,
            message: Some(message.into()),
        }
    }

    /// HTTP error with a status only.
    pub fn status(status: StatusCode) -> Self {
        RestError::Http {
            status,
            message: None,
        }
    }

    /// Wrap an arbitrary handler error; reported as a generic 500.
    pub fn unhandled(err: impl Into<BoxError>) -> Self {
        RestError::Unhandled {
            source: err.into(),
            trace: Arc::new(Backtrace::capture()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            RestError::NotFound(_) => StatusCode::NOT_FOUND,
            RestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RestError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::Http { status, .. } => *status,
            RestError::Unhandled { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the client, if the error carries one.
    pub fn client_message(&self) -> Option<&str> {
        match self {
            RestError::BadRequest(message) | RestError::InternalError(message) => {
                Some(message.as_str())
            }
            RestError::Http { message, .. } => message.as_deref(),
            RestError::MethodNotAllowed(_)
            | RestError::NotFound(_)
            | RestError::Unhandled { .. } => None,
        }
    }

    /// Backtrace captured where the error was wrapped, if any.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self {
            RestError::Unhandled { trace, .. } => Some(trace.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        RestError::unhandled(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RestError::MethodNotAllowed(Method::POST).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(RestError::NotFound("/x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            RestError::BadRequest("Invalid JSON".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestError::status(StatusCode::CONFLICT).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            RestError::unhandled("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_message() {
        assert_eq!(
            RestError::BadRequest("Invalid JSON".into()).client_message(),
            Some("Invalid JSON")
        );
        assert_eq!(
            RestError::http(StatusCode::FORBIDDEN, "no access").client_message(),
            Some("no access")
        );
        assert_eq!(RestError::NotFound("/x".into()).client_message(), None);
        assert_eq!(RestError::unhandled("secret detail").client_message(), None);
    }

    #[test]
    fn test_unhandled_keeps_source() {
        let err: RestError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.backtrace().is_some());
    }
}
