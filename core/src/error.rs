use std::fmt;

use http::StatusCode;
use thiserror::Error;

/// The error type for tentapp operations
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: Option<StatusCode>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Target url can't be turned into a canonical request (missing scheme or host).
    MalformedTarget,

    /// Request can't be signed: unsupported algorithm, empty key or no secure randomness.
    SigningFailed,

    /// Entity exposes no `Link` header to discover its profile from.
    DiscoveryUnsupported,

    /// Entity probe or profile request failed, or the profile is not json.
    ProfileFetch,

    /// Profile json lacks the core info entity or servers.
    ProfileShape,

    /// Credentials are missing the key id or the key.
    CredentialIncomplete,

    /// Credentials have already been set for this client.
    CredentialConflict,

    /// Server answered with a non-success status.
    Response,

    /// Response body is not valid json.
    Decode,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Unexpected errors (network, I/O, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach the http status that caused this error.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the http status attached to this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Check if this is a credential error
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::CredentialIncomplete | ErrorKind::CredentialConflict
        )
    }

    /// Check if this error was raised while discovering the entity.
    pub fn is_discovery_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::DiscoveryUnsupported | ErrorKind::ProfileFetch | ErrorKind::ProfileShape
        )
    }
}

// Convenience constructors
impl Error {
    /// Create a malformed target error
    pub fn malformed_target(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedTarget, message)
    }

    /// Create a signing failed error
    pub fn signing_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SigningFailed, message)
    }

    /// Create a discovery unsupported error
    pub fn discovery_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DiscoveryUnsupported, message)
    }

    /// Create a profile fetch error
    pub fn profile_fetch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProfileFetch, message)
    }

    /// Create a profile shape error
    pub fn profile_shape(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProfileShape, message)
    }

    /// Create a credential incomplete error
    pub fn credential_incomplete(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialIncomplete, message)
    }

    /// Create a credential conflict error
    pub fn credential_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialConflict, message)
    }

    /// Create a response error
    pub fn response(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Response, message)
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MalformedTarget => write!(f, "malformed target"),
            ErrorKind::SigningFailed => write!(f, "signing failed"),
            ErrorKind::DiscoveryUnsupported => write!(f, "discovery unsupported"),
            ErrorKind::ProfileFetch => write!(f, "profile fetch failed"),
            ErrorKind::ProfileShape => write!(f, "invalid profile"),
            ErrorKind::CredentialIncomplete => write!(f, "incomplete credentials"),
            ErrorKind::CredentialConflict => write!(f, "credentials already set"),
            ErrorKind::Response => write!(f, "request failed"),
            ErrorKind::Decode => write!(f, "decode failed"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
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
        Self::malformed_target(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::config_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::config_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::malformed_target(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::malformed_target(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_kind() {
        let err = Error::profile_shape("missing servers");
        assert_eq!(err.kind(), ErrorKind::ProfileShape);
        assert_eq!(err.to_string(), "invalid profile: missing servers");
        assert!(err.is_discovery_error());
        assert!(!err.is_credential_error());
    }

    #[test]
    fn test_error_with_status() {
        let err = Error::response("boom").with_status(StatusCode::NOT_FOUND);
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(Error::decode("x").status().is_none());
    }

    #[test]
    fn test_invalid_uri_is_malformed_target() {
        let err: Error = "http://[::1".parse::<http::Uri>().unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::MalformedTarget);
    }
}
