//! The request/response envelope, endpoint protocol and executors.
//!
//! This module is the reusable core of the crate:
//!
//! - [`RequestInfo`] / [`ResponseInfo`]: language-neutral envelopes for one
//!   outgoing call and one received response
//! - [`SessionInfo`]: base URL + frozen default headers per endpoint group
//! - [`Endpoint`] / [`Step`]: the suspend/resume protocol: an endpoint
//!   yields requests one at a time and is resumed with the matching
//!   responses until it completes with a typed result
//! - [`run`] / [`run_blocking`]: the two interchangeable executors
//! - [`handlers`]: built-in error handlers run after every response
//!
//! # Example
//!
//! ```rust,ignore
//! use ikea_api::{run, Constants};
//! use ikea_api::endpoints::Cart;
//!
//! let cart = Cart::new(&Constants::default(), "guest-token");
//! let state = run(cart.show()).await?;
//! println!("{state}");
//! ```

mod blocking;
mod endpoint;
mod errors;
mod executor;
pub mod handlers;
mod http_request;
mod http_response;
mod pool;
mod session;

pub use blocking::run_blocking;
pub use endpoint::{Endpoint, ErrorHandler, JsonEndpoint, Step};
pub use errors::{
    ApiError, GraphQlError, InvalidRequestError, ItemLookupError, ParseError, ResponseError,
};
pub use executor::run;
pub use http_request::{HttpMethod, RequestInfo, RequestInfoBuilder};
pub use http_response::ResponseInfo;
pub use session::{base_headers, SessionInfo};
