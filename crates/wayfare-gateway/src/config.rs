//! Gateway configuration types.
//!
//! Everything the gateway reads from its environment is resolved once, at
//! start-up, into a [`GatewayConfig`] that handlers receive through shared
//! state.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use wayfare_auth::{SessionCookie, DEFAULT_SESSION_COOKIE};
use wayfare_upstream::BackendAddresses;

/// Deployment environment, from `NODE_ENV`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local or staging deployment.
    #[default]
    Development,
    /// Production deployment.
    Production,
}

impl Environment {
    /// Parse a `NODE_ENV` value. Anything but `production` is development.
    #[must_use]
    pub fn from_node_env(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    /// Returns true in production.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Access Guard settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuardConfig {
    /// Path prefixes that need a session cookie.
    #[serde(default = "GuardConfig::default_prefixes")]
    pub protected_prefixes: Vec<String>,

    /// Where denied navigations are sent.
    #[serde(default = "GuardConfig::default_login_path")]
    pub login_path: String,
}

impl GuardConfig {
    fn default_prefixes() -> Vec<String> {
        ["/dashboard", "/users", "/finance"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn default_login_path() -> String {
        "/login".to_string()
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: Self::default_prefixes(),
            login_path: Self::default_login_path(),
        }
    }
}

/// Configuration for the gateway service.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Listen address (e.g., "0.0.0.0:3000").
    #[serde(default = "GatewayConfig::default_listen_addr")]
    pub listen_addr: String,

    /// Allowed CORS origins.
    #[serde(default = "GatewayConfig::default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    #[serde(default = "GatewayConfig::default_max_body")]
    pub max_body_bytes: usize,

    /// Inbound request timeout in seconds.
    #[serde(default = "GatewayConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Downstream request timeout in seconds.
    #[serde(default = "GatewayConfig::default_upstream_timeout")]
    pub upstream_timeout_seconds: u64,

    /// Deployment environment.
    #[serde(default)]
    pub environment: Environment,

    /// Downstream API and image service base URLs.
    #[serde(default)]
    pub addresses: BackendAddresses,

    /// Name of the session cookie.
    #[serde(default = "GatewayConfig::default_cookie_name")]
    pub session_cookie_name: String,

    /// Access Guard settings.
    #[serde(default)]
    pub guard: GuardConfig,
}

impl GatewayConfig {
    fn default_listen_addr() -> String {
        "0.0.0.0:3000".to_string()
    }

    fn default_cors_origins() -> Vec<String> {
        vec!["*".to_string()]
    }

    const fn default_max_body() -> usize {
        10 * 1024 * 1024 // uploads
    }

    const fn default_request_timeout() -> u64 {
        60
    }

    const fn default_upstream_timeout() -> u64 {
        30
    }

    fn default_cookie_name() -> String {
        DEFAULT_SESSION_COOKIE.to_string()
    }

    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Unset, blank or unparsable values keep their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self {
            addresses: BackendAddresses::from_lookup(&lookup),
            ..Self::default()
        };

        if let Some(value) = var("NODE_ENV") {
            config.environment = Environment::from_node_env(&value);
        }
        if let Some(value) = var("LISTEN_ADDR") {
            config.listen_addr = value.trim().to_string();
        }
        if let Some(value) = var("CORS_ORIGINS") {
            config.cors_origins = split_list(&value);
        }
        if let Some(secs) = var("UPSTREAM_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            config.upstream_timeout_seconds = secs;
        }
        if let Some(value) = var("SESSION_COOKIE_NAME") {
            config.session_cookie_name = value.trim().to_string();
        }
        if let Some(value) = var("PROTECTED_PREFIXES") {
            config.guard.protected_prefixes = split_list(&value);
        }
        if let Some(value) = var("LOGIN_PATH") {
            config.guard.login_path = value.trim().to_string();
        }

        config
    }

    /// Get the inbound request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Get the downstream request timeout as a `Duration`.
    #[must_use]
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }

    /// The session cookie policy. `Secure` is set in production only.
    #[must_use]
    pub fn session_cookie(&self) -> SessionCookie {
        SessionCookie::for_environment(
            self.session_cookie_name.clone(),
            self.environment.is_production(),
        )
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: Self::default_listen_addr(),
            cors_origins: Self::default_cors_origins(),
            max_body_bytes: Self::default_max_body(),
            request_timeout_seconds: Self::default_request_timeout(),
            upstream_timeout_seconds: Self::default_upstream_timeout(),
            environment: Environment::default(),
            addresses: BackendAddresses::default(),
            session_cookie_name: Self::default_cookie_name(),
            guard: GuardConfig::default(),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
