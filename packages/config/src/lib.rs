//! Configuration for the Atelier client.
//!
//! Everything the client needs to talk to the studio backend lives in a
//! [`Settings`] value that callers pass around explicitly. Nothing in the
//! other packages reads the environment directly.

use serde::{Deserialize, Serialize};
use std::env;
use std::num::ParseIntError;
use std::time::Duration;
use thiserror::Error;

pub mod constants;

pub const DEFAULT_API_URL: &str = "http://localhost:4000";
pub const DEFAULT_SOCKET_URL: &str = "ws://localhost:4000/socket";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(#[from] ParseIntError),
    #[error("Missing session email ({0} is not set)")]
    MissingSessionEmail(&'static str),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Identity of the signed-in user, as the backend knows it.
///
/// The token is minted elsewhere (the backend's own auth flow); this client
/// only carries it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub access_token: Option<String>,
}

impl Session {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            access_token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

/// Client configuration: backend endpoints plus the current session.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub socket_url: String,
    pub session: Session,
    pub http_timeout: Duration,
}

impl Settings {
    pub fn new(
        api_base_url: impl Into<String>,
        socket_url: impl Into<String>,
        session: Session,
    ) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            socket_url: socket_url.into(),
            session,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    /// Build settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url =
            lookup(constants::ATELIER_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        validate_base_url(&api_base_url)?;

        let socket_url =
            lookup(constants::ATELIER_SOCKET_URL).unwrap_or_else(|| DEFAULT_SOCKET_URL.to_string());

        let email = lookup(constants::ATELIER_SESSION_EMAIL)
            .filter(|e| !e.trim().is_empty())
            .ok_or(ConfigError::MissingSessionEmail(
                constants::ATELIER_SESSION_EMAIL,
            ))?;

        let mut session = Session::new(email);
        if let Some(token) = lookup(constants::ATELIER_ACCESS_TOKEN) {
            if !token.trim().is_empty() {
                session = session.with_token(token);
            }
        }

        let timeout_secs = match lookup(constants::ATELIER_HTTP_TIMEOUT_SECS) {
            Some(raw) => raw.parse::<u64>()?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            api_base_url,
            socket_url,
            session,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Base URL with any trailing slash removed, ready for path joining.
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}

fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidBaseUrl(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_email_is_set() {
        let settings = Settings::from_lookup(lookup_from(&[(
            constants::ATELIER_SESSION_EMAIL,
            "dev@example.com",
        )]))
        .unwrap();

        assert_eq!(settings.api_base_url, DEFAULT_API_URL);
        assert_eq!(settings.socket_url, DEFAULT_SOCKET_URL);
        assert_eq!(settings.session.email, "dev@example.com");
        assert_eq!(settings.session.access_token, None);
        assert_eq!(
            settings.http_timeout,
            Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)
        );
    }

    #[test]
    fn missing_email_is_an_error() {
        let err = Settings::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSessionEmail(_)));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[
            (constants::ATELIER_SESSION_EMAIL, "dev@example.com"),
            (constants::ATELIER_API_URL, "https://api.studio.test/"),
            (constants::ATELIER_SOCKET_URL, "wss://api.studio.test/socket"),
            (constants::ATELIER_ACCESS_TOKEN, "tok-123"),
            (constants::ATELIER_HTTP_TIMEOUT_SECS, "5"),
        ]))
        .unwrap();

        assert_eq!(settings.api_base(), "https://api.studio.test");
        assert_eq!(settings.socket_url, "wss://api.studio.test/socket");
        assert_eq!(settings.session.access_token.as_deref(), Some("tok-123"));
        assert_eq!(settings.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn malformed_base_url_is_rejected() {
        let err = Settings::from_lookup(lookup_from(&[
            (constants::ATELIER_SESSION_EMAIL, "dev@example.com"),
            (constants::ATELIER_API_URL, "localhost:4000"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
    }

    #[test]
    fn malformed_timeout_is_rejected() {
        let err = Settings::from_lookup(lookup_from(&[
            (constants::ATELIER_SESSION_EMAIL, "dev@example.com"),
            (constants::ATELIER_HTTP_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(_)));
    }
}
