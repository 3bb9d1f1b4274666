//! HTTP Client port

use std::future::Future;

use indexmap::IndexMap;
use khabari_domain::{Headers, HttpMethod};
use thiserror::Error;

/// A fully resolved request, ready to be put on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Final URL including every query parameter
    pub url: String,
    /// Headers to send, auth already merged in
    pub headers: Headers,
    /// Body bytes; `None` sends no body at all
    pub body: Option<String>,
}

/// What the transport returned, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Numeric status
    pub status: u16,
    /// Status text
    pub status_text: String,
    /// Response headers in received order
    pub headers: IndexMap<String, String>,
    /// Raw body bytes, fully read
    pub body: Vec<u8>,
    /// Declared `content-type`, if any
    pub content_type: Option<String>,
}

/// Errors raised by the transport.
///
/// A non-2xx status is never an error; it comes back as a normal response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
    /// The request did not complete in time.
    #[error("Request timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("Could not resolve host '{host}': {message}")]
    DnsError {
        /// Host that failed to resolve
        host: String,
        /// Resolver message
        message: String,
    },

    /// The server actively refused the connection.
    #[error("Connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host
        host: String,
        /// Target port
        port: u16,
    },

    /// Any other connection-level failure.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was exceeded.
    #[error("Too many redirects (limit {max})")]
    TooManyRedirects {
        /// Configured limit
        max: usize,
    },

    /// The URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The body could not be sent.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the application layer to be independent of specific HTTP libraries.
pub trait HttpClient: Send + Sync {
    /// Executes a request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails due to network issues,
    /// timeout, or other transport-level problems.
    fn execute(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, HttpClientError>> + Send;
}
