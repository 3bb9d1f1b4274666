//! Authentication domain types

mod resolver;
mod types;

pub use resolver::{AuthContribution, resolve_auth};
pub use types::{ApiKeyLocation, AuthConfig, AuthKind};
