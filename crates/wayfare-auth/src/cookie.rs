//! Session cookie policy.
//!
//! Login routes hand the downstream token to the browser in a cookie the
//! Access Guard and later requests read back. The cookie is deliberately not
//! `HttpOnly`: client-rendered pages read it to authenticate their own calls.

use std::fmt;
use std::time::Duration;

use crate::error::{AuthError, Result};

/// Default session cookie name.
pub const DEFAULT_SESSION_COOKIE: &str = "admin_token";

/// Default session lifetime.
pub const DEFAULT_SESSION_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// The `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    /// `SameSite=Strict`.
    Strict,
    /// `SameSite=Lax`.
    Lax,
    /// `SameSite=None` (requires `Secure`).
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        })
    }
}

/// Attributes of the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    name: String,
    path: String,
    max_age: Duration,
    same_site: SameSite,
    http_only: bool,
    secure: bool,
}

impl SessionCookie {
    /// A cookie policy with the default attributes:
    /// `Path=/; Max-Age=86400; SameSite=Lax`, not `HttpOnly`, not `Secure`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: "/".to_string(),
            max_age: DEFAULT_SESSION_MAX_AGE,
            same_site: SameSite::Lax,
            http_only: false,
            secure: false,
        }
    }

    /// The single environment policy: `Secure` only in production.
    #[must_use]
    pub fn for_environment(name: impl Into<String>, production: bool) -> Self {
        Self::new(name).with_secure(production)
    }

    /// Set the `Secure` attribute.
    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the session lifetime.
    #[must_use]
    pub const fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// The cookie name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the `Secure` attribute is set.
    #[must_use]
    pub const fn is_secure(&self) -> bool {
        self.secure
    }

    /// Build the `Set-Cookie` value that stores `token`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCookieValue` if the token contains characters that a
    /// cookie value cannot carry verbatim (whitespace, `;`, `,`, `"`, `\`,
    /// control characters).
    pub fn issue(&self, token: &str) -> Result<String> {
        if token.is_empty() || !token.bytes().all(is_cookie_octet) {
            tracing::warn!(cookie = %self.name, "Refusing to set session cookie with invalid value");
            return Err(AuthError::InvalidCookieValue);
        }
        Ok(self.render(token, self.max_age.as_secs()))
    }

    /// Build the `Set-Cookie` value that expires the session.
    #[must_use]
    pub fn clear(&self) -> String {
        self.render("", 0)
    }

    fn render(&self, value: &str, max_age: u64) -> String {
        let mut cookie = format!(
            "{}={}; Path={}; Max-Age={}; SameSite={}",
            self.name, value, self.path, max_age, self.same_site
        );
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_COOKIE)
    }
}

/// RFC 6265 `cookie-octet`.
const fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}
