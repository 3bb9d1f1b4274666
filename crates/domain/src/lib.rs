//! Khabari Domain - Core business types
//!
//! This crate defines the domain model for the Khabari API client:
//! requests, authentication, responses, tabs and history, plus the pure
//! functions that keep them consistent (query synchronization, auth header
//! derivation and request equality).
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod history;
pub mod id;
pub mod request;
pub mod response;
pub mod settings;
pub mod tab;

pub use auth::{ApiKeyLocation, AuthConfig, AuthContribution, AuthKind, resolve_auth};
pub use error::{DomainError, DomainResult};
pub use history::{HistoryItem, HistoryList};
pub use id::{IdGenerator, UuidV7Generator, generate_id};
pub use request::{
    Headers, HttpMethod, QueryParam, Request, format_json, is_duplicate, is_valid_json,
    requests_equal, validate_body,
};
pub use response::{Response, ResponseBody, StatusCode, StatusColorCategory, format_size};
pub use settings::AppSettings;
pub use tab::{EditorSection, Tab};
