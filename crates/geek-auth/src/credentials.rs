//! The admin account.

use crate::password::PasswordHasher;
use crate::AuthError;

/// The single admin login, configured at deploy time.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

impl AdminCredentials {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Check a login attempt. Emails compare case-insensitively.
    ///
    /// The password is verified even when the email does not match so both
    /// failures take the same time.
    pub fn verify(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let email_matches = email.trim().eq_ignore_ascii_case(self.email.trim());
        let password_matches = PasswordHasher::new().verify(password, &self.password_hash)?;
        if email_matches && password_matches {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}
