//! Credential handling for the wayfare gateway.
//!
//! This crate provides the two pieces of authentication the gateway does
//! itself. Token validation is never one of them: the downstream service
//! owns it.
//!
//! - **Credential Resolver**: bearer token from the `Authorization` header,
//!   falling back to the session cookie
//! - **Session cookie policy**: the `Set-Cookie` value login routes emit
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────────┐
//! │   Gateway        │────▶│ resolve_credential() │── Authorization: Bearer …
//! │   route handler  │     └──────────────────────┘── Cookie: admin_token=…
//! └────────┬─────────┘
//!          │ login succeeded
//!          ▼
//! ┌──────────────────┐
//! │  SessionCookie   │── Set-Cookie: admin_token=…; Path=/; SameSite=Lax
//! └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use http::{header::COOKIE, HeaderMap, HeaderValue};
//! use wayfare_auth::{resolve_credential, SessionCookie, DEFAULT_SESSION_COOKIE};
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(COOKIE, HeaderValue::from_static("admin_token=T"));
//!
//! let credential = resolve_credential(&headers, DEFAULT_SESSION_COOKIE).unwrap();
//! assert_eq!(credential.authorization_value(), "Bearer T");
//!
//! let set_cookie = SessionCookie::for_environment(DEFAULT_SESSION_COOKIE, false)
//!     .issue(credential.token())
//!     .unwrap();
//! assert!(set_cookie.starts_with("admin_token=T;"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cookie;
pub mod credential;
pub mod error;

pub use cookie::{SameSite, SessionCookie, DEFAULT_SESSION_COOKIE, DEFAULT_SESSION_MAX_AGE};
pub use credential::{
    bearer_token, cookie_value, resolve_credential, Credential, CredentialSource,
};
pub use error::{AuthError, Result};
