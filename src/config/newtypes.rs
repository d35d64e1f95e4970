//! Validated newtype wrappers for locale configuration values.
//!
//! This module provides type-safe wrappers around the country and language
//! codes used to localize API calls. Invalid values are rejected with clear
//! error messages on construction.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

fn is_two_letter_lowercase(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_lowercase())
}

/// A validated two-letter country code.
///
/// Country codes select the retail market all localized endpoints operate
/// against (e.g., `de` for the German market).
///
/// # Example
///
/// ```rust
/// use ikea_api::CountryCode;
///
/// let country = CountryCode::new("de").unwrap();
/// assert_eq!(country.as_ref(), "de");
/// assert!(CountryCode::new("DE").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CountryCode(String);

impl CountryCode {
    /// Creates a new validated country code.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCountryCode`] if the value is not a
    /// two-letter lowercase ASCII code.
    pub fn new(code: impl Into<String>) -> Result<Self, ConfigError> {
        let code = code.into();
        if !is_two_letter_lowercase(&code) {
            return Err(ConfigError::InvalidCountryCode { code });
        }
        Ok(Self(code))
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CountryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(de::Error::custom)
    }
}

/// A validated two-letter language code.
///
/// Language codes select the localization of product names, descriptions
/// and delivery texts returned by the API.
///
/// # Example
///
/// ```rust
/// use ikea_api::LanguageCode;
///
/// let language = LanguageCode::new("en").unwrap();
/// assert_eq!(language.as_ref(), "en");
/// assert!(LanguageCode::new("eng").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Creates a new validated language code.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLanguageCode`] if the value is not a
    /// two-letter lowercase ASCII code.
    pub fn new(code: impl Into<String>) -> Result<Self, ConfigError> {
        let code = code.into();
        if !is_two_letter_lowercase(&code) {
            return Err(ConfigError::InvalidLanguageCode { code });
        }
        Ok(Self(code))
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for LanguageCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for LanguageCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(de::Error::custom)
    }
}
