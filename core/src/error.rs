use std::fmt;
use thiserror::Error;

/// The error type for graphsign operations.
#[derive(Error, Debug)]
#[error("{message}{}", format_context(.context))]
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<String>,
    #[source]
    source: Option<anyhow::Error>,
    retryable: bool,
}

/// The kind of error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The logical action is not part of the service's action table.
    InvalidAction,

    /// The HTTP method is not supported by the signing scheme.
    UnsupportedMethod,

    /// No credential source could produce a complete credential set.
    CredentialsUnavailable,

    /// The query payload cannot be url-encoded.
    MalformedQueryPayload,

    /// Unexpected errors (network, I/O, service errors, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::new(),
            source: None,
            retryable: false,
        }
    }

    /// Add a source error.
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach contextual information, e.g. `"url: http://..."`.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Mark whether the operation that produced this error may be retried.
    pub fn set_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Check if the operation that produced this error may be retried.
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }
}

// Convenience constructors
impl Error {
    /// Create an invalid action error.
    pub fn invalid_action(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidAction, message)
    }

    /// Create an unsupported method error.
    pub fn unsupported_method(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedMethod, message)
    }

    /// Create a credentials unavailable error.
    pub fn credentials_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialsUnavailable, message)
    }

    /// Create a malformed query payload error.
    pub fn malformed_query_payload(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedQueryPayload, message)
    }

    /// Create an unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

fn format_context(context: &[String]) -> String {
    if context.is_empty() {
        return String::new();
    }

    let mut s = String::new();
    for ctx in context {
        s.push_str(", ");
        s.push_str(ctx);
    }
    s
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidAction => write!(f, "invalid action"),
            ErrorKind::UnsupportedMethod => write!(f, "unsupported method"),
            ErrorKind::CredentialsUnavailable => write!(f, "credentials unavailable"),
            ErrorKind::MalformedQueryPayload => write!(f, "malformed query payload"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_with_context() {
        let err = Error::credentials_unavailable("failed to fetch credentials")
            .with_context("operation: fetch_credentials")
            .with_context("profile: default");

        assert_eq!(
            err.to_string(),
            "failed to fetch credentials, operation: fetch_credentials, profile: default"
        );
        assert_eq!(err.kind(), ErrorKind::CredentialsUnavailable);
    }

    #[test]
    fn test_error_retryable() {
        let err = Error::unexpected("connection reset").set_retryable(true);
        assert!(err.is_retryable());

        let err = Error::invalid_action("no such action");
        assert!(!err.is_retryable());
    }
}
