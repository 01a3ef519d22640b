#![forbid(unsafe_code)]

//! Synchronizer configuration.
//!
//! Defaults reproduce the markup contract exactly, so an embedder only needs
//! configuration when its templates diverge. The host may also hand over a
//! JSON document; every section and field is optional.
//!
//! # Example
//!
//! ```
//! use hxsync_core::config::{Locale, SyncConfig};
//!
//! let config = SyncConfig::from_json_str(r#"{"notifications": {"locale": "en"}}"#).unwrap();
//! assert_eq!(config.notifications.locale, Locale::En);
//! assert_eq!(config.naming.modal_slot, "modal-form-dialog");
//! ```

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::naming::Naming;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The JSON document did not parse.
    #[error("invalid configuration JSON: {0}")]
    Json(String),
    /// A required string was empty.
    #[error("configuration field `{0}` must not be empty")]
    Empty(&'static str),
    /// The cell prefix must be a single ASCII digit.
    #[error("cell prefix {0:?} must be a single ASCII digit")]
    CellPrefix(String),
}

/// Language of user-facing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

/// User-facing strings for notices and confirmations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub error_heading: String,
    pub confirm_title: String,
    pub delete_text: String,
    pub delete_button: String,
    pub reactivate_text: String,
    pub reactivate_button: String,
    pub cancel_button: String,
}

impl Labels {
    /// Built-in strings for a locale.
    #[must_use]
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Es => Self {
                error_heading: "Se ha producido un error".to_string(),
                confirm_title: "¿Está seguro?".to_string(),
                delete_text: "Se eliminará el registro seleccionado".to_string(),
                delete_button: "Eliminar".to_string(),
                reactivate_text: "Se reactivará el registro seleccionado".to_string(),
                reactivate_button: "Reactivar".to_string(),
                cancel_button: "Cancelar".to_string(),
            },
            Locale::En => Self {
                error_heading: "An error occurred".to_string(),
                confirm_title: "Are you sure?".to_string(),
                delete_text: "The selected record will be deleted".to_string(),
                delete_button: "Delete".to_string(),
                reactivate_text: "The selected record will be reactivated".to_string(),
                reactivate_button: "Reactivate".to_string(),
                cancel_button: "Cancel".to_string(),
            },
        }
    }
}

/// Notification channel settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Auto-dismiss delay of success notices, in milliseconds.
    pub success_dismiss_ms: u64,
    /// Locale of the built-in labels.
    pub locale: Locale,
    /// Replaces the built-in labels entirely when set.
    pub labels: Option<Labels>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            success_dismiss_ms: 2000,
            locale: Locale::default(),
            labels: None,
        }
    }
}

impl NotificationConfig {
    /// Success auto-dismiss delay.
    #[must_use]
    pub const fn success_dismiss(&self) -> Duration {
        Duration::from_millis(self.success_dismiss_ms)
    }

    /// Effective labels: overrides if present, else the locale's built-ins.
    #[must_use]
    pub fn labels(&self) -> Labels {
        self.labels
            .clone()
            .unwrap_or_else(|| Labels::for_locale(self.locale))
    }
}

/// Date-picker construction defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatePickerConfig {
    /// Class applied to the picker's buttons.
    pub button_class: String,
    /// Calendar language code.
    pub language: String,
}

impl Default for DatePickerConfig {
    fn default() -> Self {
        Self {
            button_class: "btn".to_string(),
            language: "es".to_string(),
        }
    }
}

/// Input mask patterns.
///
/// Pattern syntax: `9` is a digit slot, `[...]` wraps optional trailing slots,
/// anything else is a literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Fixed-length phone-style field.
    pub cell_pattern: String,
    /// Digit every cell value must start with.
    pub cell_prefix: String,
    /// Variable-length numeric field.
    pub number_pattern: String,
    /// Clear incomplete variable-length values when the field loses focus.
    pub clear_incomplete: bool,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            cell_pattern: "999999999".to_string(),
            cell_prefix: "9".to_string(),
            number_pattern: "99999999[999999999]".to_string(),
            clear_incomplete: true,
        }
    }
}

/// Full synchronizer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub naming: Naming,
    pub notifications: NotificationConfig,
    pub date_picker: DatePickerConfig,
    pub masks: MaskConfig,
}

impl SyncConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Json(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the naming conventions.
    #[must_use]
    pub fn with_naming(mut self, naming: Naming) -> Self {
        self.naming = naming;
        self
    }

    /// Set the locale of built-in labels.
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.notifications.locale = locale;
        self
    }

    /// Set the success auto-dismiss delay.
    #[must_use]
    pub fn with_success_dismiss(mut self, delay: Duration) -> Self {
        self.notifications.success_dismiss_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Replace the mask patterns.
    #[must_use]
    pub fn with_masks(mut self, masks: MaskConfig) -> Self {
        self.masks = masks;
        self
    }

    /// Check that every id, prefix and pattern is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.naming.fields() {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(field));
            }
        }
        if self.masks.cell_pattern.is_empty() {
            return Err(ConfigError::Empty("cell_pattern"));
        }
        if self.masks.number_pattern.is_empty() {
            return Err(ConfigError::Empty("number_pattern"));
        }
        let prefix = &self.masks.cell_prefix;
        if prefix.len() != 1 || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::CellPrefix(prefix.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_markup_contract() {
        let config = SyncConfig::default();
        assert_eq!(config.naming.modal_slot, "modal-form-dialog");
        assert_eq!(config.naming.submit_id, "btn-modal-enviar");
        assert_eq!(config.notifications.success_dismiss(), Duration::from_millis(2000));
        assert_eq!(config.masks.number_pattern, "99999999[999999999]");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            SyncConfig::from_json_str(r#"{"naming": {"focus_id": "id_title"}}"#).unwrap();
        assert_eq!(config.naming.focus_id, "id_title");
        assert_eq!(config.naming.modal_id, "modal-form");
    }

    #[test]
    fn empty_id_is_rejected() {
        let err = SyncConfig::from_json_str(r#"{"naming": {"modal_slot": " "}}"#).unwrap_err();
        assert_eq!(err, ConfigError::Empty("modal_slot"));
    }

    #[test]
    fn cell_prefix_must_be_one_digit() {
        let masks = MaskConfig {
            cell_prefix: "98".to_string(),
            ..MaskConfig::default()
        };
        let err = SyncConfig::default().with_masks(masks).validate().unwrap_err();
        assert_eq!(err, ConfigError::CellPrefix("98".to_string()));
    }

    #[test]
    fn label_override_wins_over_locale() {
        let mut config = SyncConfig::default().with_locale(Locale::En);
        assert_eq!(config.notifications.labels().cancel_button, "Cancel");
        let mut labels = Labels::for_locale(Locale::Es);
        labels.cancel_button = "Volver".to_string();
        config.notifications.labels = Some(labels);
        assert_eq!(config.notifications.labels().cancel_button, "Volver");
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            SyncConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }
}
