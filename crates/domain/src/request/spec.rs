//! Request as edited in a tab.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Headers, HttpMethod, QueryParam};
use crate::auth::{AuthConfig, AuthKind};

/// Title shown for a request whose URL is still empty.
pub const UNTITLED: &str = "New Request";

/// An HTTP request as edited in a tab.
///
/// The `id` is fixed at construction; everything else is editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    id: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Target URL, including the query string built from `params`
    pub url: String,
    /// HTTP headers in display order
    #[serde(default)]
    pub headers: Headers,
    /// Raw request body
    #[serde(default)]
    pub body: String,
    /// Query parameter rows, including disabled ones
    #[serde(default)]
    pub params: Vec<QueryParam>,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// When the request was first created
    pub created_at: DateTime<Utc>,
    /// When the request was last dispatched (or created, if never sent)
    pub timestamp: DateTime<Utc>,
}

impl Request {
    /// Creates an empty `GET` request.
    #[must_use]
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            method: HttpMethod::default(),
            url: String::new(),
            headers: Headers::new(),
            body: String::new(),
            params: Vec::new(),
            auth: AuthConfig::default(),
            created_at: now,
            timestamp: now,
        }
    }

    /// Creates the default template request used for new tabs.
    #[must_use]
    pub fn from_template(
        id: impl Into<String>,
        now: DateTime<Utc>,
        default_headers: &Headers,
    ) -> Self {
        Self {
            headers: default_headers.clone(),
            ..Self::new(id, now)
        }
    }

    /// Returns the immutable identifier of this request.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the title a tab holding this request displays.
    #[must_use]
    pub fn title(&self) -> &str {
        if self.url.is_empty() { UNTITLED } else { &self.url }
    }

    /// Records a dispatch at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.timestamp = now;
    }

    /// Switches the auth type, discarding the previous configuration.
    pub fn switch_auth(&mut self, kind: AuthKind) {
        self.auth = self.auth.switch_to(kind);
    }
}
