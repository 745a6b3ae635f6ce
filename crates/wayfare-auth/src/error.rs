//! Authentication error types.

use thiserror::Error;

/// A result type using `AuthError`.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors raised while handling credentials and session cookies.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token in the `Authorization` header nor the session cookie.
    #[error("missing credential")]
    MissingCredential,

    /// The token cannot be carried in a cookie without altering it.
    #[error("token contains characters not allowed in a cookie value")]
    InvalidCookieValue,
}
