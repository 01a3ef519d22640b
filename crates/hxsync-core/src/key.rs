#![forbid(unsafe_code)]

//! Correlation keys.
//!
//! A [`CorrelationKey`] ties an outcome event, a child-panel slot, and the
//! panel's affordance controls together. On the wire it is usually the primary
//! key of the parent record, sent either as a JSON number or a string.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when a string cannot be used as a correlation key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// The key was empty after trimming.
    #[error("correlation key is empty")]
    Empty,
    /// The key contains a character that cannot appear inside an element id.
    #[error("correlation key {key:?} contains invalid character {ch:?}")]
    InvalidChar { key: String, ch: char },
}

/// Identifier shared by a parent record's controls and its child panel.
///
/// Keys are restricted to ASCII alphanumerics, `-` and `_` so that they can be
/// concatenated into element ids and event names without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorrelationKey(String);

impl CorrelationKey {
    /// Parse and validate a key.
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(KeyError::Empty);
        }
        if let Some(ch) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(KeyError::InvalidChar {
                key: trimmed.to_string(),
                ch,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The key as it appears in ids and event names.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for CorrelationKey {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for CorrelationKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CorrelationKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CorrelationKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = CorrelationKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a correlation key as a string or non-negative integer")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(CorrelationKey::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .map(CorrelationKey::from)
                    .map_err(|_| E::custom(format!("negative correlation key {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                CorrelationKey::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}
