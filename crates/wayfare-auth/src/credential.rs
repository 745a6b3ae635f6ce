//! Credential resolution.
//!
//! A credential is whatever bearer token the client presented, taken from the
//! `Authorization` header or, failing that, from the session cookie. No
//! structural or expiry check happens here; the downstream service is the
//! only authority on token validity.

use std::fmt;

use http::header::{AUTHORIZATION, COOKIE};
use http::HeaderMap;

/// Where a credential was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// `Authorization: Bearer <token>`.
    Header,
    /// The session cookie.
    Cookie,
}

/// A bearer token presented by the client.
///
/// `Debug` output is redacted so the token never reaches logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    source: CredentialSource,
}

impl Credential {
    /// Wrap a token. Empty tokens are rejected.
    #[must_use]
    pub fn new(token: impl Into<String>, source: CredentialSource) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            return None;
        }
        Some(Self { token, source })
    }

    /// The raw token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Where the token came from.
    #[must_use]
    pub const fn source(&self) -> CredentialSource {
        self.source
    }

    /// The value for a downstream `Authorization` header.
    #[must_use]
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Resolve the request credential.
///
/// Checks `Authorization: Bearer <token>` first, then the cookie named
/// `cookie_name`. Returns `None` when neither carries a non-empty token.
#[must_use]
pub fn resolve_credential(headers: &HeaderMap, cookie_name: &str) -> Option<Credential> {
    if let Some(token) = bearer_token(headers) {
        return Credential::new(token, CredentialSource::Header);
    }

    cookie_value(headers, cookie_name)
        .and_then(|token| Credential::new(token, CredentialSource::Cookie))
}

/// Extract the token of an `Authorization: Bearer <token>` header.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Find a non-empty cookie value across all `Cookie` headers.
#[must_use]
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    const COOKIE_NAME: &str = "admin_token";

    fn headers(pairs: &[(&http::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn bearer_header_wins() {
        let map = headers(&[
            (&AUTHORIZATION, "Bearer from-header"),
            (&COOKIE, "admin_token=from-cookie"),
        ]);
        let credential = resolve_credential(&map, COOKIE_NAME).unwrap();
        assert_eq!(credential.token(), "from-header");
        assert_eq!(credential.source(), CredentialSource::Header);
        assert_eq!(credential.authorization_value(), "Bearer from-header");
    }

    #[test]
    fn falls_back_to_cookie() {
        let map = headers(&[(&COOKIE, "theme=dark; admin_token=abc.def; lang=en")]);
        let credential = resolve_credential(&map, COOKIE_NAME).unwrap();
        assert_eq!(credential.token(), "abc.def");
        assert_eq!(credential.source(), CredentialSource::Cookie);
    }

    #[test]
    fn non_bearer_scheme_falls_back_to_cookie() {
        let map = headers(&[
            (&AUTHORIZATION, "Basic dXNlcjpwYXNz"),
            (&COOKIE, "admin_token=T"),
        ]);
        assert_eq!(resolve_credential(&map, COOKIE_NAME).unwrap().token(), "T");
    }

    #[test]
    fn empty_bearer_falls_back_to_cookie() {
        let map = headers(&[(&AUTHORIZATION, "Bearer "), (&COOKIE, "admin_token=T")]);
        assert_eq!(resolve_credential(&map, COOKIE_NAME).unwrap().token(), "T");
    }

    #[test]
    fn absent_when_nothing_present() {
        assert!(resolve_credential(&HeaderMap::new(), COOKIE_NAME).is_none());

        let map = headers(&[(&COOKIE, "admin_token=; other=1")]);
        assert!(resolve_credential(&map, COOKIE_NAME).is_none());
    }

    #[test]
    fn cookie_name_must_match_exactly() {
        let map = headers(&[(&COOKIE, "xadmin_token=nope; admin_token_old=nope")]);
        assert!(cookie_value(&map, COOKIE_NAME).is_none());
    }

    #[test]
    fn multiple_cookie_headers() {
        let map = headers(&[(&COOKIE, "a=1"), (&COOKIE, "admin_token=\"quoted\"")]);
        assert_eq!(cookie_value(&map, COOKIE_NAME), Some("quoted"));
    }

    #[test]
    fn debug_is_redacted() {
        let credential = Credential::new("secret-token", CredentialSource::Header).unwrap();
        let debug = format!("{credential:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("redacted"));
    }
}
