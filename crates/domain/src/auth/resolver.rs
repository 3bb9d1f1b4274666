//! Derives request headers and query additions from an auth configuration.

use base64::{Engine, engine::general_purpose::STANDARD};
use indexmap::IndexMap;

use super::{ApiKeyLocation, AuthConfig};
use crate::request::Headers;

/// Header and query contributions of an [`AuthConfig`], applied at dispatch.
///
/// Query additions are never written back into the request's parameter rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContribution {
    /// Headers to set on the outgoing request.
    pub headers: Headers,
    /// Query parameters to append to the outgoing URL.
    pub query_additions: IndexMap<String, String>,
}

impl AuthContribution {
    /// Returns true if nothing is contributed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.query_additions.is_empty()
    }
}

/// Resolves `auth` into its contributions.
///
/// A mechanism whose required fields are empty contributes nothing; the
/// request then goes out unauthenticated rather than failing.
#[must_use]
pub fn resolve_auth(auth: &AuthConfig) -> AuthContribution {
    let mut contribution = AuthContribution::default();
    match auth {
        AuthConfig::None => {}
        AuthConfig::Basic { username, password } => {
            if !username.is_empty() && !password.is_empty() {
                let credentials = STANDARD.encode(format!("{username}:{password}"));
                contribution
                    .headers
                    .insert("Authorization", format!("Basic {credentials}"));
            }
        }
        AuthConfig::Bearer { token } => {
            if !token.is_empty() {
                contribution
                    .headers
                    .insert("Authorization", format!("Bearer {token}"));
            }
        }
        AuthConfig::ApiKey {
            key,
            value,
            location,
        } => {
            if !key.is_empty() && !value.is_empty() {
                match location {
                    ApiKeyLocation::Header => contribution.headers.insert(key, value),
                    ApiKeyLocation::Query => {
                        contribution.query_additions.insert(key.clone(), value.clone());
                    }
                }
            }
        }
    }
    contribution
}
