//! Configuration types for the client.
//!
//! The main types in this module are:
//!
//! - [`Constants`]: process-wide locale and user-agent settings shared by
//!   every endpoint group
//! - [`ConstantsBuilder`]: a builder for constructing [`Constants`]
//! - [`CountryCode`] / [`LanguageCode`]: validated locale newtypes
//!
//! # Example
//!
//! ```rust
//! use ikea_api::{Constants, CountryCode, LanguageCode};
//!
//! let constants = Constants::builder()
//!     .country(CountryCode::new("de").unwrap())
//!     .language(LanguageCode::new("de").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(constants.local_base_url(), "https://www.ikea.com/de/de");
//! ```

mod newtypes;

pub use newtypes::{CountryCode, LanguageCode};

use crate::error::ConfigError;

/// Base URL of the retail website; all localized paths hang off it.
pub const BASE_URL: &str = "https://www.ikea.com";

/// Locale and user-agent configuration shared by every endpoint group.
///
/// `Constants` is pure data: it holds the country/language pair that
/// localizes API calls and the user agent the remote service sees. Endpoint
/// groups copy what they need into their own immutable
/// [`SessionInfo`](crate::clients::SessionInfo) when constructed.
///
/// # Thread Safety
///
/// `Constants` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use ikea_api::Constants;
///
/// // The default configuration targets the us/en market
/// let constants = Constants::default();
/// assert_eq!(constants.country().as_ref(), "us");
/// assert_eq!(constants.language().as_ref(), "en");
/// ```
#[derive(Clone, Debug)]
pub struct Constants {
    country: CountryCode,
    language: LanguageCode,
    user_agent_prefix: Option<String>,
}

// Verify Constants is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Constants>();
};

impl Constants {
    /// Creates a new builder for constructing `Constants`.
    #[must_use]
    pub fn builder() -> ConstantsBuilder {
        ConstantsBuilder::new()
    }

    /// Returns the configured country code.
    #[must_use]
    pub const fn country(&self) -> &CountryCode {
        &self.country
    }

    /// Returns the configured language code.
    #[must_use]
    pub const fn language(&self) -> &LanguageCode {
        &self.language
    }

    /// Returns the base URL of the retail website.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        BASE_URL
    }

    /// Returns the localized base URL, `{base}/{country}/{language}`.
    #[must_use]
    pub fn local_base_url(&self) -> String {
        format!(
            "{BASE_URL}/{}/{}",
            self.country.as_ref(),
            self.language.as_ref()
        )
    }

    /// Returns the `User-Agent` value sent with every request.
    ///
    /// The remote service rejects requests without a browser-looking user
    /// agent, so the default imitates one; an optional prefix identifies
    /// the embedding application.
    #[must_use]
    pub fn user_agent(&self) -> String {
        let prefix = self
            .user_agent_prefix
            .as_ref()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        format!(
            "{prefix}Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
             AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36"
        )
    }
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            country: CountryCode::new("us").expect("static country code is valid"),
            language: LanguageCode::new("en").expect("static language code is valid"),
            user_agent_prefix: None,
        }
    }
}

/// Builder for constructing [`Constants`] instances.
#[derive(Debug, Default)]
pub struct ConstantsBuilder {
    country: Option<CountryCode>,
    language: Option<LanguageCode>,
    user_agent_prefix: Option<String>,
}

impl ConstantsBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Sets the country code.
    #[must_use]
    pub fn country(mut self, country: CountryCode) -> Self {
        self.country = Some(country);
        self
    }

    /// Sets the language code.
    #[must_use]
    pub fn language(mut self, language: LanguageCode) -> Self {
        self.language = Some(language);
        self
    }

    /// Sets an application prefix for the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`Constants`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `country` or
    /// `language` was not set.
    pub fn build(self) -> Result<Constants, ConfigError> {
        let country = self
            .country
            .ok_or(ConfigError::MissingRequiredField { field: "country" })?;
        let language = self
            .language
            .ok_or(ConfigError::MissingRequiredField { field: "language" })?;

        Ok(Constants {
            country,
            language,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
