//! On-disk token cache.
//!
//! Tokens survive process restarts in a small JSON file. The cache follows
//! a read-then-write-on-miss pattern; a corrupt or unreadable file is
//! treated as empty and rewritten on the next store.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::ApiError;

/// One cached token with its expiry.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct CachedToken {
    /// The bearer token value.
    pub token: String,
    /// When the token stops being accepted, if known.
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Returns `true` if the token is still usable.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.expires_at.map_or(true, |at| at > Utc::now())
    }
}

/// The cache file contents: a guest token and an authorized token.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct CachedTokens {
    /// Anonymous guest token.
    pub guest: Option<CachedToken>,
    /// Token from the authorized login flow.
    pub authorized: Option<CachedToken>,
}

/// A JSON file caching the guest and authorized tokens.
///
/// # Example
///
/// ```rust,no_run
/// use ikea_api::auth::TokenCache;
///
/// let cache = TokenCache::new("/tmp/ikea-tokens.json");
/// let tokens = cache.load();
/// assert!(tokens.guest.is_none() || tokens.guest.unwrap().token.len() > 0);
/// ```
#[derive(Clone, Debug)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    /// Creates a cache backed by the given file path.
    ///
    /// The file is not touched until [`load`](Self::load) or
    /// [`store`](Self::store) is called.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cached tokens.
    ///
    /// A missing file yields the empty default. A corrupt or unreadable
    /// file is treated as empty (and logged); the next
    /// [`store`](Self::store) rewrites it.
    #[must_use]
    pub fn load(&self) -> CachedTokens {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return CachedTokens::default(),
            Err(e) => {
                tracing::warn!("token cache at {} is unreadable: {e}", self.path.display());
                return CachedTokens::default();
            }
        };

        serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!(
                "token cache at {} is corrupt, treating as empty: {e}",
                self.path.display()
            );
            CachedTokens::default()
        })
    }

    /// Writes the cached tokens, replacing the file contents.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Io`] if the file cannot be written.
    pub fn store(&self, tokens: &CachedTokens) -> Result<(), ApiError> {
        let text = serde_json::to_string_pretty(tokens).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        fs::write(&self.path, text)?;
        Ok(())
    }

    /// Returns the cached guest token if it is present and fresh.
    #[must_use]
    pub fn fresh_guest(&self) -> Option<CachedToken> {
        self.load().guest.filter(CachedToken::is_fresh)
    }

    /// Returns the cached authorized token if it is present and fresh.
    #[must_use]
    pub fn fresh_authorized(&self) -> Option<CachedToken> {
        self.load().authorized.filter(CachedToken::is_fresh)
    }
}
