//! Error types for the Postcoder client.
//!
//! # Design
//! Every failure a caller can see is one variant of `PostcoderError`. Local
//! validation and HTTP 400 share `Parameter`; the other classified statuses
//! get one variant each. Both "body is not JSON" and "JSON has the wrong
//! shape" land in `Json`, distinguished only by `context`. Anything the
//! transport reports is carried through unclassified in `Transport`.

use thiserror::Error;

use crate::transport::TransportError;

/// Message used when the server rejects a request without saying why.
pub(crate) const UNKNOWN_REASON: &str = "Unknown reason";

pub(crate) const JSON_NOT_FOUND: &str = "JSON expected but not found";
pub(crate) const JSON_SHAPE_MISMATCH: &str = "Could not map JSON to expected structure";

/// Errors returned by the Postcoder client.
#[derive(Debug, Error)]
pub enum PostcoderError {
    /// A parameter was missing, blank or of the wrong type, either caught
    /// locally before any request or reported by the server with a 400.
    #[error("{message}{}", format_status(400, .url))]
    Parameter { message: String, url: Option<String> },

    /// 403: the API key is invalid or the account has no credit left.
    #[error("{message} | 403 {url}")]
    Account { message: String, url: String },

    /// 404: the endpoint does not exist.
    #[error("Endpoint not found | 404 {url}")]
    EndpointNotFound { url: String },

    /// 405: the endpoint exists but not for this HTTP method.
    #[error("Method not allowed | 405 {url}")]
    MethodNotAllowed { url: String },

    /// 500: the service failed.
    #[error("Server error | 500 {url}")]
    Server { url: String },

    /// The body was not JSON, or was JSON of the wrong shape.
    #[error("{context} | {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The transport could not complete the round-trip.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Fieldless view of `PostcoderError` for matching and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Parameter,
    Account,
    EndpointNotFound,
    MethodNotAllowed,
    Server,
    Json,
    Transport,
}

impl PostcoderError {
    pub(crate) fn missing(name: &str) -> Self {
        Self::local(format!("Required parameter is missing: {name}"))
    }

    pub(crate) fn not_a_string(name: &str) -> Self {
        Self::local(format!("Parameter is not a string: {name}"))
    }

    pub(crate) fn not_an_integer(name: &str) -> Self {
        Self::local(format!("Parameter is not an integer: {name}"))
    }

    pub(crate) fn local(message: impl Into<String>) -> Self {
        PostcoderError::Parameter {
            message: message.into(),
            url: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PostcoderError::Parameter { .. } => ErrorKind::Parameter,
            PostcoderError::Account { .. } => ErrorKind::Account,
            PostcoderError::EndpointNotFound { .. } => ErrorKind::EndpointNotFound,
            PostcoderError::MethodNotAllowed { .. } => ErrorKind::MethodNotAllowed,
            PostcoderError::Server { .. } => ErrorKind::Server,
            PostcoderError::Json { .. } => ErrorKind::Json,
            PostcoderError::Transport(_) => ErrorKind::Transport,
        }
    }

    /// The requested URL, for failures classified from an HTTP status.
    pub fn url(&self) -> Option<&str> {
        match self {
            PostcoderError::Parameter { url, .. } => url.as_deref(),
            PostcoderError::Account { url, .. }
            | PostcoderError::EndpointNotFound { url }
            | PostcoderError::MethodNotAllowed { url }
            | PostcoderError::Server { url } => Some(url),
            PostcoderError::Json { .. } | PostcoderError::Transport(_) => None,
        }
    }
}

fn format_status(status: u16, url: &Option<String>) -> String {
    match url {
        Some(url) => format!(" | {status} {url}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_parameter_error_has_no_url() {
        let err = PostcoderError::missing("query");
        assert_eq!(err.to_string(), "Required parameter is missing: query");
        assert_eq!(err.kind(), ErrorKind::Parameter);
        assert!(err.url().is_none());
    }

    #[test]
    fn remote_parameter_error_quotes_status_and_url() {
        let err = PostcoderError::Parameter {
            message: "Invalid country".to_string(),
            url: Some("https://ws.example/pcw/k/address/xx/q".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Invalid country | 400 https://ws.example/pcw/k/address/xx/q"
        );
    }

    #[test]
    fn json_error_keeps_context_and_source() {
        let source = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err = PostcoderError::Json {
            context: JSON_NOT_FOUND,
            source,
        };
        assert!(err.to_string().starts_with("JSON expected but not found | "));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.kind(), ErrorKind::Json);
    }
}
