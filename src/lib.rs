//! # IKEA API client
//!
//! A Rust client for IKEA's undocumented retail web APIs: token
//! acquisition, item lookup, search (text and image), cart, delivery
//! quotes and purchase history. It performs the actions a browser session
//! would perform by replaying the HTTP calls the official website makes,
//! including the reverse-engineered OAuth/PKCE login and the anti-bot
//! headers.
//!
//! **These are private, versionless APIs.** The vendor changes them without
//! notice; everything here, the login flow especially, can break at any
//! time.
//!
//! ## Overview
//!
//! - [`Constants`]: locale configuration shared by every endpoint group
//! - [`clients`]: the request/response envelope, the suspend/resume
//!   [`Endpoint`](clients::Endpoint) protocol, and the two executors
//!   ([`run`], [`run_blocking`])
//! - [`endpoints`]: one group per remote operation (cart, items, search,
//!   order capture, purchases, stock)
//! - [`auth`]: guest tokens, the PKCE login flow, the on-disk token cache
//! - [`wrappers`]: higher-level orchestration returning typed models
//! - [`item_code`]: item-code extraction and formatting
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ikea_api::{run, Constants, CountryCode, LanguageCode};
//! use ikea_api::auth::get_guest_token;
//! use ikea_api::endpoints::Search;
//!
//! # async fn example() -> Result<(), ikea_api::ApiError> {
//! let constants = Constants::builder()
//!     .country(CountryCode::new("de").unwrap())
//!     .language(LanguageCode::new("de").unwrap())
//!     .build()
//!     .unwrap();
//!
//! // Anonymous token, enough for most operations
//! let token = run(get_guest_token(&constants)).await?;
//!
//! // Free-text catalog search
//! let search = Search::new(&constants);
//! let results = run(search.search("billy", 24)).await?;
//! println!("{results}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Endpoints are values
//!
//! Constructing an endpoint is side-effect-free: each group method returns
//! a not-yet-executed, single-use value describing the whole (possibly
//! multi-step) exchange. The executors drive it: send each yielded request,
//! run the registered error handlers against the response, resume the
//! endpoint, repeat until it completes. The blocking executor does the same
//! with the calling thread parked on I/O.
//!
//! ```rust,no_run
//! use ikea_api::{run_blocking, Constants};
//! use ikea_api::endpoints::Stock;
//!
//! # fn example() -> Result<(), ikea_api::ApiError> {
//! let stock = Stock::new(&Constants::default());
//! let availability = run_blocking(stock.get_stock(&["00263850"]))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state** beyond the keyed transport pool: configuration is
//!   instance-based and passed explicitly
//! - **Fail-fast validation**: locale newtypes and request envelopes
//!   validate on construction
//! - **Endpoints decide what is an error**: non-2xx statuses are not
//!   automatically fatal; fallback chains consume them, handlers reject
//!   them
//! - **Async-first** with a semantically identical blocking variant

pub mod auth;
pub mod clients;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod item_code;
pub mod wrappers;

// Re-export public types at crate root for convenience
pub use clients::{run, run_blocking, ApiError, GraphQlError, ItemLookupError, ParseError, ResponseError};
pub use config::{Constants, ConstantsBuilder, CountryCode, LanguageCode};
pub use error::ConfigError;

// Re-export auth entry points for convenience
pub use auth::{get_guest_token, AuthError, AuthToken, LoginFlow, TokenCache};
