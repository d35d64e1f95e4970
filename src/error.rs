//! Configuration error types.
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and
//! actionable.
//!
//! # Example
//!
//! ```rust
//! use ikea_api::{CountryCode, ConfigError};
//!
//! let result = CountryCode::new("usa");
//! assert!(matches!(result, Err(ConfigError::InvalidCountryCode { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while building client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Country code is not a two-letter lowercase code.
    #[error("Invalid country code '{code}'. Expected a two-letter lowercase ISO 3166-1 code (e.g., 'de').")]
    InvalidCountryCode {
        /// The invalid code that was provided.
        code: String,
    },

    /// Language code is not a two-letter lowercase code.
    #[error("Invalid language code '{code}'. Expected a two-letter lowercase ISO 639-1 code (e.g., 'de').")]
    InvalidLanguageCode {
        /// The invalid code that was provided.
        code: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
