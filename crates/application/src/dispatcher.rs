//! Request dispatcher
//!
//! Turns an edited [`Request`] into a [`Response`]: merges auth into the
//! headers and query, sends it through the [`HttpClient`] port, times the
//! round trip and classifies the body.

use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use khabari_domain::{Request, Response, resolve_auth};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::ports::{Clock, HttpClient, HttpClientError, TransportRequest};

/// A transport failure, carried as a single human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(transparent)]
pub struct NetworkError(#[from] HttpClientError);

impl NetworkError {
    /// Returns the message shown to the user and stored in history.
    #[must_use]
    pub fn message(&self) -> String {
        self.0.to_string()
    }

    /// Returns the underlying transport error.
    #[must_use]
    pub const fn kind(&self) -> &HttpClientError {
        &self.0
    }
}

/// Sends requests through an [`HttpClient`].
pub struct Dispatcher<C: HttpClient> {
    client: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C: HttpClient> Dispatcher<C> {
    /// Creates a dispatcher over the given transport and clock.
    pub fn new(client: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }

    /// Sends `request` and returns the instrumented response.
    ///
    /// `OPTIONS` never reaches the network: it is answered locally with a
    /// `200 OK` echoing the headers that would have been sent.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` when the transport fails. A non-2xx status is
    /// a normal response.
    pub async fn send(&self, request: &Request) -> Result<Response, NetworkError> {
        let transport = Self::prepare(request);

        if request.method.is_preflight() {
            debug!(url = %transport.url, "answering OPTIONS locally");
            return Ok(Response::preflight(
                transport.headers.into_inner(),
                self.clock.now(),
            ));
        }

        debug!(method = %transport.method, url = %transport.url, "dispatching request");

        let start = Instant::now();
        let result = self.client.execute(transport).await;
        let elapsed = start.elapsed();

        match result {
            Ok(raw) => {
                debug!(
                    status = raw.status,
                    ?elapsed,
                    "response received"
                );
                Ok(Response::new(
                    raw.status,
                    raw.status_text,
                    raw.headers,
                    raw.content_type.as_deref(),
                    &raw.body,
                    elapsed,
                    self.clock.now(),
                ))
            }
            Err(error) => {
                warn!(%error, "request failed");
                Err(NetworkError::from(error))
            }
        }
    }

    /// Builds the wire form of a request: final URL, merged headers, body.
    ///
    /// The request's URL is sent as stored; the store keeps it in step with
    /// the param rows. Auth query pairs are appended here only.
    #[must_use]
    pub fn prepare(request: &Request) -> TransportRequest {
        let auth = resolve_auth(&request.auth);

        let mut headers = request.headers.clone();
        headers.merge_over(&auth.headers);

        let url = append_query(&request.url, &auth.query_additions);

        let body = request
            .method
            .transmits_body()
            .then(|| request.body.clone());

        TransportRequest {
            method: request.method,
            url,
            headers,
            body,
        }
    }
}

/// Appends dispatch-only query pairs (such as an API key) to `url`.
///
/// A URL that does not parse is returned unchanged and left for the
/// transport to reject.
fn append_query(url: &str, additions: &IndexMap<String, String>) -> String {
    if additions.is_empty() {
        return url.to_string();
    }
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    parsed.query_pairs_mut().extend_pairs(additions.iter());
    parsed.to_string()
}
