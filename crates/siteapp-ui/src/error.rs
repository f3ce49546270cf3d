//! Error types for the page bindings.

use thiserror::Error;

use crate::config::ConfigError;

/// Failures raised while wiring the helpers to the page.
#[derive(Debug, Error)]
pub enum UiError {
    /// Settings could not be loaded.
    #[error("settings rejected")]
    Config(#[from] ConfigError),
    /// Caller-supplied request options were unusable.
    #[error("invalid request options")]
    InvalidOptions {
        /// Human-readable detail.
        detail: String,
    },
    /// A browser API call failed.
    #[error("browser call failed")]
    Js {
        /// Stringified JavaScript error.
        detail: String,
    },
    /// Logging could not be initialised.
    #[error("failed to install log subscriber")]
    Logging {
        /// Subscriber error detail.
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_convert_and_keep_source() {
        let config = ConfigError::InvalidField {
            field: "error_title",
            reason: "must not be empty",
        };
        let err = UiError::from(config);
        assert_eq!(err.to_string(), "settings rejected");
        assert!(std::error::Error::source(&err).is_some());
    }
}
