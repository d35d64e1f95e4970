//! One module per remote operation group.
//!
//! Each group struct is constructed from [`Constants`](crate::Constants)
//! (plus a token where the service wants one), owns its frozen
//! [`SessionInfo`](crate::clients::SessionInfo), and returns
//! not-yet-executed endpoint values. Constructing an endpoint is
//! side-effect-free; pass it to [`run`](crate::run) or
//! [`run_blocking`](crate::run_blocking) to execute it.

mod cart;
mod items;
mod order_capture;
mod purchases;
mod search;
mod stock;

pub use cart::Cart;
pub use items::{
    handle_ingka_error, IngkaItems, IowsItems, IowsItemsEndpoint, ItemKind, PipItem,
    PipItemEndpoint, MAX_BATCH_SIZE,
};
pub use order_capture::{CheckoutItem, OrderCapture};
pub use purchases::Purchases;
pub use search::Search;
pub use stock::Stock;
