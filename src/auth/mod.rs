//! Token acquisition: guest tokens and the authorized login flow.
//!
//! Two tokens exist:
//!
//! - a **guest token**, handed out anonymously and sufficient for pre-login
//!   actions (cart, delivery quotes)
//! - an **authorized token**, obtained by replaying the website's PKCE
//!   OAuth2 login ([`LoginFlow`]) and required for purchase history
//!
//! The login flow scrapes session configuration and hidden form fields out
//! of vendor HTML pages. Every step depends on exact, versionless knowledge
//! of the vendor's current page structure: **it may break without notice**.
//! The scraping seams live in [`scrape`] so they can be swapped or mocked
//! independently of the step sequence.
//!
//! Tokens can be cached on disk between runs via [`TokenCache`].

mod error;
mod flow;
mod pkce;
pub mod scrape;
mod token_cache;

pub use error::AuthError;
pub use flow::{get_guest_token, get_guest_token_cached, GuestTokenEndpoint, LoginFlow};
pub use pkce::CodeVerifier;
pub use token_cache::{CachedToken, CachedTokens, TokenCache};

use chrono::{DateTime, Utc};

/// An access token together with its expiry, if the server reported one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthToken {
    /// The bearer token value.
    pub access_token: String,
    /// When the token stops being accepted.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthToken {
    /// Returns `true` if the token has a known expiry in the past.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}
