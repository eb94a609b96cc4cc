//! Authentication errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No session for the presented token.
    #[error("session not found")]
    SessionNotFound,

    #[error("session expired")]
    SessionExpired,

    /// No token in the request.
    #[error("missing session token")]
    MissingToken,

    #[error("password too weak: {0}")]
    WeakPassword(String),

    /// The configured password hash is not a valid PHC string.
    #[error("invalid password hash: {0}")]
    InvalidHash(String),

    #[error("cache error: {0}")]
    Cache(#[from] geek_cache::CacheError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether the request should be answered with 401.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::SessionNotFound
                | AuthError::SessionExpired
                | AuthError::MissingToken
        )
    }
}
