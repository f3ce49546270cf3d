//! Page-level settings for the request helpers.
//!
//! # Design
//! - Every field has a default so pages can install a partial JSON document.
//! - Validation rejects values that would leave the helpers unusable.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::core::scroll::DEFAULT_SCROLL_OFFSET;

/// Upper bound for the indicator reveal delay.
const MAX_SHOW_DELAY_MS: u64 = 60_000;

/// Errors raised while loading [`UiSettings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings document was not valid JSON for this shape.
    #[error("invalid settings document")]
    Parse {
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// A field carried an unusable value.
    #[error("invalid settings field")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}

/// Behaviour and DOM wiring for the request helpers.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiSettings {
    /// Delay before the loading indicator appears, in milliseconds.
    pub show_delay_ms: u64,
    /// Indicator text shown when a reveal happens.
    pub loading_message: String,
    /// Title used for every error modal.
    pub error_title: String,
    /// Message shown for transport failures without a custom handler.
    pub generic_error_message: String,
    /// Gap left above a smooth-scroll target.
    pub scroll_offset: f64,
    /// Selector for the loading indicator element.
    pub indicator_selector: String,
    /// Selector, relative to the indicator, for its message node.
    pub indicator_message_selector: String,
    /// Selector for the error modal element.
    pub modal_selector: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            show_delay_ms: 500,
            loading_message: "Loading...".to_string(),
            error_title: "Error".to_string(),
            generic_error_message: "Something went wrong, sorry.".to_string(),
            scroll_offset: DEFAULT_SCROLL_OFFSET,
            indicator_selector: "#ajax_loading_indicator".to_string(),
            indicator_message_selector: "div.message".to_string(),
            modal_selector: "#global_modal".to_string(),
        }
    }
}

impl UiSettings {
    /// Parse and validate a JSON settings document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::InvalidField`] when validation fails.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let settings: Self =
            serde_json::from_str(raw).map_err(|source| ConfigError::Parse { source })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check field values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.show_delay_ms > MAX_SHOW_DELAY_MS {
            return Err(invalid("show_delay_ms", "exceeds 60000"));
        }
        if !self.scroll_offset.is_finite() || self.scroll_offset < 0.0 {
            return Err(invalid("scroll_offset", "must be finite and non-negative"));
        }
        let required = [
            ("loading_message", &self.loading_message),
            ("error_title", &self.error_title),
            ("generic_error_message", &self.generic_error_message),
            ("indicator_selector", &self.indicator_selector),
            ("indicator_message_selector", &self.indicator_message_selector),
            ("modal_selector", &self.modal_selector),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }
        Ok(())
    }

    /// Indicator reveal delay.
    #[must_use]
    pub const fn show_delay(&self) -> Duration {
        Duration::from_millis(self.show_delay_ms)
    }
}

const fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidField { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let settings = UiSettings::from_json("{}").unwrap();
        assert_eq!(settings, UiSettings::default());
        assert_eq!(settings.show_delay(), Duration::from_millis(500));
    }

    #[test]
    fn partial_document_overrides_fields() {
        let settings =
            UiSettings::from_json(r#"{"show_delay_ms": 250, "error_title": "Oops"}"#).unwrap();
        assert_eq!(settings.show_delay_ms, 250);
        assert_eq!(settings.error_title, "Oops");
        assert_eq!(settings.loading_message, "Loading...");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = UiSettings::from_json(r#"{"show_delay": 1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn invalid_values_name_the_field() {
        let err = UiSettings::from_json(r#"{"show_delay_ms": 120000}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "show_delay_ms",
                ..
            }
        ));
        let err = UiSettings::from_json(r#"{"modal_selector": "  "}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "modal_selector",
                ..
            }
        ));
        let err = UiSettings::from_json(r#"{"scroll_offset": -1.0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "scroll_offset",
                ..
            }
        ));
    }
}
