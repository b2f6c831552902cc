//! The I/O seam between request building and response parsing.
//!
//! A `Transport` takes a fully built `HttpRequest` and returns whatever the
//! server answered as an `HttpResponse`. It must not turn 4xx/5xx statuses
//! into errors: status interpretation belongs to `PostcoderClient`. Only
//! faults that prevent a response altogether are reported as
//! `TransportError`.

use std::error::Error as StdError;

use thiserror::Error;

use crate::http::{HttpRequest, HttpResponse};

/// A fault below HTTP: connection refused, TLS failure, unreadable body.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Executes one HTTP round-trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use std::fmt;

    use super::{Transport, TransportError};
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a `ureq` agent.
    ///
    /// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
    /// responses come back as data.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl fmt::Debug for UreqTransport {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("UreqTransport").finish_non_exhaustive()
        }
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            let result = match request.method {
                HttpMethod::Get => {
                    let mut builder = self.agent.get(request.url.as_str());
                    for (name, value) in &request.headers {
                        builder = builder.header(name.as_str(), value.as_str());
                    }
                    builder.call()
                }
                HttpMethod::Post => {
                    let mut builder = self.agent.post(request.url.as_str());
                    for (name, value) in &request.headers {
                        builder = builder.header(name.as_str(), value.as_str());
                    }
                    match &request.body {
                        Some(body) => builder.send(body.as_bytes()),
                        None => builder.send_empty(),
                    }
                }
            };

            let mut response = result.map_err(|e| {
                TransportError::with_source(format!("{} {} failed", request.method, request.url), e)
            })?;

            let status = response.status().as_u16();
            let body = response.body_mut().read_to_string().map_err(|e| {
                TransportError::with_source("could not read response body", e)
            })?;

            Ok(HttpResponse {
                status,
                url: request.url.clone(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_exposes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::with_source("GET http://localhost:1/ failed", io);
        assert_eq!(err.to_string(), "GET http://localhost:1/ failed");
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn transport_error_without_source() {
        let err = TransportError::new("offline");
        assert!(StdError::source(&err).is_none());
    }
}
