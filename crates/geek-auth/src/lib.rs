//! Admin authentication for the AluraGeek catalog.
//!
//! One admin account is configured at deploy time ([`AdminCredentials`]).
//! A successful login opens an [`AuthSession`] in the key-value store; the
//! token travels back as a bearer token or the `geek_session` cookie.

mod credentials;
mod error;
mod password;
mod session;
mod token;

pub use credentials::AdminCredentials;
pub use error::AuthError;
pub use password::PasswordHasher;
pub use session::{AuthSession, SessionId, SessionStore};
pub use token::{clear_session_cookie, session_cookie, session_token, SESSION_COOKIE};
