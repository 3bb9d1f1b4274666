//! Response as shown in a tab and stored in history.

use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is any error status (4xx or 5xx).
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.0 >= 400 && self.0 < 600
    }

    /// Returns the canonical reason phrase for common status codes.
    #[must_use]
    pub const fn reason_phrase(&self) -> &'static str {
        match self.0 {
            100 => "Continue",
            101 => "Switching Protocols",
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            307 => "Temporary Redirect",
            308 => "Permanent Redirect",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }

    /// Returns the styling category for UI display.
    #[must_use]
    pub const fn color_category(&self) -> StatusColorCategory {
        match self.0 {
            100..=199 => StatusColorCategory::Informational,
            200..=299 => StatusColorCategory::Success,
            300..=399 => StatusColorCategory::Redirection,
            400..=499 => StatusColorCategory::ClientError,
            500..=599 => StatusColorCategory::ServerError,
            _ => StatusColorCategory::Unknown,
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// Color category for status code display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColorCategory {
    /// Blue - 1xx
    Informational,
    /// Green - 2xx
    Success,
    /// Blue - 3xx
    Redirection,
    /// Orange - 4xx
    ClientError,
    /// Red - 5xx
    ServerError,
    /// Gray - unknown
    Unknown,
}

/// A response body, classified by the declared content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResponseBody {
    /// Parsed `application/json` body.
    Json(serde_json::Value),
    /// Any other body, or a declared-JSON body that failed to parse.
    Text(String),
}

impl ResponseBody {
    /// Classifies raw body bytes.
    ///
    /// A content type containing `application/json` is parsed as JSON;
    /// everything else, including JSON that fails to parse, is kept as
    /// (lossily decoded) text.
    #[must_use]
    pub fn classify(content_type: Option<&str>, raw: &[u8]) -> Self {
        let declared_json = content_type
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"));
        if declared_json {
            if let Ok(value) = serde_json::from_slice(raw) {
                return Self::Json(value);
            }
        }
        Self::Text(String::from_utf8_lossy(raw).into_owned())
    }

    /// Returns the body as it is measured and displayed (compact for JSON).
    #[must_use]
    pub fn serialized(&self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }

    /// Returns the body for reading: pretty-printed JSON or the raw text.
    #[must_use]
    pub fn pretty(&self) -> String {
        match self {
            Self::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Self::Text(text) => text.clone(),
        }
    }
}

impl Default for ResponseBody {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// An HTTP response as shown in a tab and stored in history.
///
/// Immutable once constructed; a new dispatch replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    status: u16,
    status_text: String,
    #[serde(default)]
    headers: IndexMap<String, String>,
    data: ResponseBody,
    #[serde(with = "duration_millis")]
    elapsed: Duration,
    size_bytes: usize,
    received_at: DateTime<Utc>,
}

impl Response {
    /// Builds a response from what the transport returned.
    ///
    /// The body is classified with [`ResponseBody::classify`] and its size
    /// is the byte length of the serialized body.
    #[must_use]
    pub fn new(
        status: u16,
        status_text: impl Into<String>,
        headers: IndexMap<String, String>,
        content_type: Option<&str>,
        raw_body: &[u8],
        elapsed: Duration,
        received_at: DateTime<Utc>,
    ) -> Self {
        let data = ResponseBody::classify(content_type, raw_body);
        let size_bytes = data.serialized().len();
        Self {
            status,
            status_text: status_text.into(),
            headers,
            data,
            elapsed,
            size_bytes,
            received_at,
        }
    }

    /// Synthetic `200 OK` answered locally for an `OPTIONS` request.
    ///
    /// Echoes the headers that would have been sent, with an empty body and
    /// zero elapsed time.
    #[must_use]
    pub fn preflight(echoed_headers: IndexMap<String, String>, received_at: DateTime<Utc>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            headers: echoed_headers,
            data: ResponseBody::default(),
            elapsed: Duration::ZERO,
            size_bytes: 0,
            received_at,
        }
    }

    /// Returns the numeric status.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns the status as a `StatusCode`.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::new(self.status)
    }

    /// Returns the status text reported by the server.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Returns the response headers in received order.
    #[must_use]
    pub const fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the classified body.
    #[must_use]
    pub const fn data(&self) -> &ResponseBody {
        &self.data
    }

    /// Returns the wall-clock time spent on the round trip.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns the size of the serialized body in bytes.
    #[must_use]
    pub const fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Returns when the response was received.
    #[must_use]
    pub const fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code().is_success()
    }

    /// Returns a human-readable size string (e.g., "1.20 KB").
    #[must_use]
    pub fn size_display(&self) -> String {
        format_size(self.size_bytes)
    }

    /// Returns a human-readable duration string (e.g., "124 ms").
    #[must_use]
    pub fn elapsed_display(&self) -> String {
        let millis = self.elapsed.as_millis();
        if millis < 1000 {
            format!("{millis} ms")
        } else {
            format!("{:.2} s", self.elapsed.as_secs_f64())
        }
    }
}

/// Formats a byte count as bytes, or kilobytes with two decimals from 1024 up.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;

    if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
