//! Authentication configuration types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Authentication configuration for a request.
///
/// Each variant carries only the fields of its own mechanism, so switching
/// mechanisms cannot leave stale fields behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "config", rename_all = "camelCase")]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,
    /// Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },
    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },
    /// API Key authentication
    ApiKey {
        /// Header or query parameter name
        key: String,
        /// The API key value
        value: String,
        /// Where to add the key
        location: ApiKeyLocation,
    },
}

/// Location for API key authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyLocation {
    /// Add to request headers
    #[default]
    Header,
    /// Add to query parameters at dispatch time
    Query,
}

impl FromStr for ApiKeyLocation {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "header" => Ok(Self::Header),
            "query" => Ok(Self::Query),
            other => Err(DomainError::UnsupportedApiKeyLocation(other.to_string())),
        }
    }
}

/// The tag of an [`AuthConfig`], without its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthKind {
    /// See [`AuthConfig::None`].
    #[default]
    None,
    /// See [`AuthConfig::Basic`].
    Basic,
    /// See [`AuthConfig::Bearer`].
    Bearer,
    /// See [`AuthConfig::ApiKey`].
    ApiKey,
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Bearer => "bearer",
            Self::ApiKey => "apiKey",
        };
        f.write_str(label)
    }
}

impl AuthConfig {
    /// Creates a basic authentication.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates a bearer token authentication.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Creates an API key authentication.
    #[must_use]
    pub fn api_key(
        key: impl Into<String>,
        value: impl Into<String>,
        location: ApiKeyLocation,
    ) -> Self {
        Self::ApiKey {
            key: key.into(),
            value: value.into(),
            location,
        }
    }

    /// Returns the tag of this configuration.
    #[must_use]
    pub const fn kind(&self) -> AuthKind {
        match self {
            Self::None => AuthKind::None,
            Self::Basic { .. } => AuthKind::Basic,
            Self::Bearer { .. } => AuthKind::Bearer,
            Self::ApiKey { .. } => AuthKind::ApiKey,
        }
    }

    /// Returns true if authentication is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns the configuration for `kind`.
    ///
    /// Selecting the current kind keeps the existing fields; any other kind
    /// starts from an empty configuration.
    #[must_use]
    pub fn switch_to(&self, kind: AuthKind) -> Self {
        if kind == self.kind() {
            return self.clone();
        }
        match kind {
            AuthKind::None => Self::None,
            AuthKind::Basic => Self::basic("", ""),
            AuthKind::Bearer => Self::bearer(""),
            AuthKind::ApiKey => Self::api_key("", "", ApiKeyLocation::default()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_auth_none() {
        let auth = AuthConfig::None;
        assert!(!auth.is_configured());
        assert_eq!(auth.kind(), AuthKind::None);
    }

    #[test]
    fn test_switch_to_other_kind_starts_empty() {
        let auth = AuthConfig::basic("alice", "secret");
        assert_eq!(auth.switch_to(AuthKind::Bearer), AuthConfig::bearer(""));
        assert_eq!(
            auth.switch_to(AuthKind::ApiKey),
            AuthConfig::api_key("", "", ApiKeyLocation::Header)
        );
        assert_eq!(auth.switch_to(AuthKind::None), AuthConfig::None);
    }

    #[test]
    fn test_switch_to_same_kind_keeps_fields() {
        let auth = AuthConfig::bearer("abc");
        assert_eq!(auth.switch_to(AuthKind::Bearer), auth);
    }

    #[test]
    fn test_serde_shape_is_type_plus_config() {
        let auth = AuthConfig::api_key("X-Api-Key", "k", ApiKeyLocation::Query);
        let json = serde_json::to_value(&auth).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "apiKey",
                "config": {"key": "X-Api-Key", "value": "k", "location": "query"}
            })
        );

        let none = serde_json::to_value(AuthConfig::None).unwrap();
        assert_eq!(none, serde_json::json!({"type": "none"}));
    }

    #[test]
    fn test_api_key_location_from_str() {
        assert_eq!("Query".parse::<ApiKeyLocation>().unwrap(), ApiKeyLocation::Query);
        assert!("cookie".parse::<ApiKeyLocation>().is_err());
    }
}
