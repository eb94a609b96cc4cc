//! Component configuration.
//!
//! Values come from Spin variables inside the component and from the
//! environment (upper-cased keys) natively. Empty values count as unset,
//! since Spin needs a default for every optional variable.

use std::collections::HashMap;

use chrono::Duration;
use geek_auth::AdminCredentials;
use geek_media::CloudinaryConfig;
use geek_observability::{LogFormat, LogLevel};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required variable `{0}`")]
    Missing(&'static str),

    #[error("invalid value {value:?} for `{key}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// The variable provider itself failed.
    #[error("variable source error: {0}")]
    Source(String),
}

/// Where configuration values are read from.
pub trait VariableSource {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError>;
}

/// Process environment, `cloudinary_api_key` read as `CLOUDINARY_API_KEY`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvVariables;

impl VariableSource for EnvVariables {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(std::env::var(key.to_ascii_uppercase()).ok())
    }
}

/// Fixed values, for tests and tools.
#[derive(Debug, Default, Clone)]
pub struct MapVariables(HashMap<String, String>);

impl MapVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapVariables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl VariableSource for MapVariables {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.0.get(key).cloned())
    }
}

/// Spin application variables.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinVariables;

#[cfg(target_arch = "wasm32")]
impl VariableSource for SpinVariables {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        use spin_sdk::variables::{self, Error};

        match variables::get(key) {
            Ok(value) => Ok(Some(value)),
            Err(Error::Undefined(_)) => Ok(None),
            Err(e) => Err(ConfigError::Source(e.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cloudinary: CloudinaryConfig,
    pub admin: AdminCredentials,
    pub session_ttl: Duration,
    /// How long rendered page data stays cached.
    pub page_ttl: Duration,
    pub max_body_bytes: usize,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub const DEFAULT_SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;
    pub const DEFAULT_PAGE_TTL_SECS: i64 = 60 * 60;
    /// Upper bound for both lifetimes: ten years.
    pub const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;
    /// Room for a 5 MiB image once base64-encoded.
    pub const DEFAULT_MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

    pub fn load(source: &dyn VariableSource) -> Result<Self, ConfigError> {
        let vars = Reader(source);
        Ok(Self {
            cloudinary: CloudinaryConfig {
                cloud_name: vars.required("cloudinary_cloud_name")?,
                api_key: vars.required("cloudinary_api_key")?,
                api_secret: vars.required("cloudinary_api_secret")?,
                upload_preset: vars.optional("cloudinary_upload_preset")?,
                folder: vars.optional("cloudinary_folder")?,
            },
            admin: AdminCredentials::new(
                vars.required("admin_email")?,
                vars.required("admin_password_hash")?,
            ),
            session_ttl: vars.ttl("session_ttl_secs", Self::DEFAULT_SESSION_TTL_SECS)?,
            page_ttl: vars.ttl("page_ttl_secs", Self::DEFAULT_PAGE_TTL_SECS)?,
            max_body_bytes: vars.parsed("max_body_bytes", Self::DEFAULT_MAX_BODY_BYTES)?,
            log_level: vars.parsed("log_level", LogLevel::Info)?,
            log_format: vars.parsed("log_format", LogFormat::Json)?,
        })
    }
}

struct Reader<'a>(&'a dyn VariableSource);

impl Reader<'_> {
    fn optional(&self, key: &'static str) -> Result<Option<String>, ConfigError> {
        Ok(self
            .0
            .get(key)?
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()))
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key)?.ok_or(ConfigError::Missing(key))
    }

    fn parsed<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key)? {
            None => Ok(default),
            Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
        }
    }

    /// A lifetime in whole seconds, between one second and
    /// [`AppConfig::MAX_TTL_SECS`].
    fn ttl(&self, key: &'static str, default_secs: i64) -> Result<Duration, ConfigError> {
        let secs: i64 = self.parsed(key, default_secs)?;
        let invalid = |reason: String| ConfigError::Invalid {
            key,
            value: secs.to_string(),
            reason,
        };
        if !(1..=AppConfig::MAX_TTL_SECS).contains(&secs) {
            return Err(invalid(format!(
                "must be between 1 and {} seconds",
                AppConfig::MAX_TTL_SECS
            )));
        }
        Duration::try_seconds(secs).ok_or_else(|| invalid("out of range".into()))
    }
}
