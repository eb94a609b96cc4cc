//! Admin sessions kept in the key-value store.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use geek_cache::{cache_key, Cache};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Opaque session token, `sess_` followed by 144 random bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        let mut bytes = [0_u8; 18];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(format!("sess_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub id: SessionId,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    /// Seven days.
    pub const DEFAULT_TTL_SECS: i64 = 7 * 24 * 60 * 60;

    pub fn new(
        email: impl Into<String>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Internal("session lifetime out of range".into()))?;
        Ok(Self {
            id: SessionId::generate(),
            email: email.into(),
            created_at: now,
            expires_at,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Seconds left, zero once expired.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }

    fn cache_key(id: &SessionId) -> String {
        cache_key!("session", id)
    }
}

/// Sessions stored as JSON under `session:<token>`.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(cache: Cache, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn create(&self, email: &str) -> Result<AuthSession, AuthError> {
        let session = AuthSession::new(email, self.ttl, Utc::now())?;
        self.cache
            .set(&AuthSession::cache_key(&session.id), &session)?;
        Ok(session)
    }

    /// Look a token up. Expired sessions are removed.
    pub fn get(&self, token: &str) -> Result<AuthSession, AuthError> {
        let key = AuthSession::cache_key(&SessionId::from(token));
        let session: AuthSession = self.cache.get(&key)?.ok_or(AuthError::SessionNotFound)?;
        if session.is_expired_at(Utc::now()) {
            self.cache.delete(&key)?;
            return Err(AuthError::SessionExpired);
        }
        Ok(session)
    }

    /// Remove a session. Unknown tokens are ignored.
    pub fn revoke(&self, token: &str) -> Result<(), AuthError> {
        self.cache
            .delete(&AuthSession::cache_key(&SessionId::from(token)))?;
        Ok(())
    }
}
