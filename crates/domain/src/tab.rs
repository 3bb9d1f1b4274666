//! Editor tabs
//!
//! A tab holds one request being edited plus the outcome of its latest
//! dispatch. Tabs are owned by the store in the application layer.

use serde::{Deserialize, Serialize};

use crate::request::Request;
use crate::response::Response;

/// Which section of the request editor is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorSection {
    /// Query parameter rows
    #[default]
    Params,
    /// Header rows
    Headers,
    /// Auth configuration
    Auth,
    /// Request body
    Body,
}

impl EditorSection {
    /// Returns the lowercase name, as serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Params => "params",
            Self::Headers => "headers",
            Self::Auth => "auth",
            Self::Body => "body",
        }
    }
}

/// An open editor tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    id: String,
    /// Display title, derived from the request URL
    pub title: String,
    /// The request being edited
    pub request: Request,
    /// Latest response, if any
    #[serde(default)]
    pub response: Option<Response>,
    /// Latest transport error message, if any
    #[serde(default)]
    pub error: Option<String>,
    /// Validation error for the request body, shown next to the editor
    #[serde(default)]
    pub body_error: Option<String>,
    /// Focused editor section
    #[serde(default)]
    pub section: EditorSection,
    /// True while a dispatch started from this tab is in flight
    #[serde(skip)]
    pub loading: bool,
}

impl Tab {
    /// Creates a tab around `request`.
    #[must_use]
    pub fn new(id: impl Into<String>, request: Request) -> Self {
        Self {
            id: id.into(),
            title: request.title().to_string(),
            request,
            response: None,
            error: None,
            body_error: None,
            section: EditorSection::default(),
            loading: false,
        }
    }

    /// Returns the tab identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Replaces the request and re-derives the title from its URL.
    pub fn set_request(&mut self, request: Request) {
        self.title = request.title().to_string();
        self.request = request;
    }

    /// Replaces the response and error together and clears the loading flag.
    pub fn set_outcome(&mut self, response: Option<Response>, error: Option<String>) {
        self.response = response;
        self.error = error;
        self.loading = false;
    }

    /// Records the outcome of a dispatch.
    ///
    /// A failure leaves the response empty.
    pub fn apply_result(&mut self, result: Result<Response, String>) {
        match result {
            Ok(response) => self.set_outcome(Some(response), None),
            Err(message) => self.set_outcome(None, Some(message)),
        }
    }
}
