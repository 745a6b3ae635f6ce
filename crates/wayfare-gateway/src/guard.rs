//! Access Guard.
//!
//! A cheap presence check at the edge: navigations to protected pages
//! without a session cookie are sent to the login page. The cookie's token
//! is never validated here; the downstream rejects bad tokens on the first
//! data call.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use wayfare_auth::cookie_value;

use crate::config::GuardConfig;
use crate::state::GatewayState;

/// Outcome of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Proceed untouched.
    Allowed,
    /// Redirect (307) to `location`.
    Denied {
        /// Login URL carrying the original path.
        location: String,
    },
}

/// Protected prefixes plus the login target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGuard {
    prefixes: Vec<String>,
    login_path: String,
    cookie_name: String,
}

impl AccessGuard {
    /// Build a guard that looks for `cookie_name`.
    #[must_use]
    pub fn new(config: &GuardConfig, cookie_name: impl Into<String>) -> Self {
        let prefixes = config
            .protected_prefixes
            .iter()
            .map(|p| format!("/{}", p.trim().trim_matches('/')))
            .collect();

        Self {
            prefixes,
            login_path: config.login_path.clone(),
            cookie_name: cookie_name.into(),
        }
    }

    /// Whether `path` falls under a protected prefix.
    ///
    /// Matching is per segment: `/users` covers `/users` and `/users/7`, not
    /// `/usersettings`.
    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        if path == self.login_path {
            return false;
        }
        self.prefixes.iter().any(|prefix| {
            prefix == "/"
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    /// Decide whether a request to `path` may proceed.
    #[must_use]
    pub fn evaluate(&self, path: &str, headers: &HeaderMap) -> Decision {
        if !self.is_protected(path) || cookie_value(headers, &self.cookie_name).is_some() {
            return Decision::Allowed;
        }

        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("redirect", path)
            .finish();
        Decision::Denied {
            location: format!("{}?{query}", self.login_path),
        }
    }
}

/// Middleware running the [`AccessGuard`] before any handler.
pub async fn access_guard(
    State(state): State<Arc<GatewayState>>,
    request: Request,
    next: Next,
) -> Response {
    match state.guard.evaluate(request.uri().path(), request.headers()) {
        Decision::Allowed => next.run(request).await,
        Decision::Denied { location } => {
            tracing::debug!(path = %request.uri().path(), "Access guard redirecting to login");
            Redirect::temporary(&location).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::COOKIE;
    use axum::http::HeaderValue;

    use super::*;

    fn guard() -> AccessGuard {
        AccessGuard::new(&GuardConfig::default(), "admin_token")
    }

    fn with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn prefix_matching_is_per_segment() {
        let guard = guard();
        assert!(guard.is_protected("/users"));
        assert!(guard.is_protected("/users/7"));
        assert!(guard.is_protected("/finance/reports/2024"));
        assert!(!guard.is_protected("/usersettings"));
        assert!(!guard.is_protected("/"));
        assert!(!guard.is_protected("/login"));
    }

    #[test]
    fn denied_without_cookie() {
        assert_eq!(
            guard().evaluate("/dashboard", &HeaderMap::new()),
            Decision::Denied {
                location: "/login?redirect=%2Fdashboard".to_string()
            }
        );
    }

    #[test]
    fn any_cookie_value_is_allowed() {
        let headers = with_cookie("theme=dark; admin_token=expired-or-forged");
        assert_eq!(guard().evaluate("/users/7", &headers), Decision::Allowed);
    }

    #[test]
    fn empty_cookie_is_absent() {
        let headers = with_cookie("admin_token=");
        assert!(matches!(
            guard().evaluate("/finance", &headers),
            Decision::Denied { .. }
        ));
    }

    #[test]
    fn unprotected_paths_pass() {
        assert_eq!(guard().evaluate("/cities/bali", &HeaderMap::new()), Decision::Allowed);
        assert_eq!(guard().evaluate("/api/cities", &HeaderMap::new()), Decision::Allowed);
    }

    #[test]
    fn configured_prefixes_are_normalized() {
        let config = GuardConfig {
            protected_prefixes: vec!["reports/".to_string()],
            login_path: "/signin".to_string(),
        };
        let guard = AccessGuard::new(&config, "session");
        assert!(guard.is_protected("/reports/q3"));
        assert_eq!(
            guard.evaluate("/reports", &HeaderMap::new()),
            Decision::Denied {
                location: "/signin?redirect=%2Freports".to_string()
            }
        );
    }
}
