//! Newtype ids for catalog records.
//!
//! Ids are random UUIDs rendered in their hyphenated lowercase form, which is
//! also how they appear in page paths (`/product/<id>`).

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an id without checking its format.
            ///
            /// Meant for values read back from the store.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn generate() -> Self {
                Self(Uuid::new_v4().hyphenated().to_string())
            }

            /// Parse untrusted input, `None` unless it is a UUID.
            pub fn parse(input: &str) -> Option<Self> {
                Uuid::parse_str(input.trim())
                    .ok()
                    .map(|uuid| Self(uuid.hyphenated().to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for geek_db::Value {
            fn from(id: $name) -> Self {
                geek_db::Value::Text(id.0)
            }
        }

        impl From<&$name> for geek_db::Value {
            fn from(id: &$name) -> Self {
                geek_db::Value::Text(id.0.clone())
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);
