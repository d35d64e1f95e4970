//! Item lookup variants.
//!
//! Three services answer item questions, each with its own quirks:
//!
//! - [`IngkaItems`]: the primary batch lookup (≤50 codes per request)
//! - [`PipItem`]: per-item product pages, with a bounded 404 fallback
//!   between the single-article and combination URL shapes
//! - [`IowsItems`]: the legacy catalog, which needs every code tagged
//!   `ART`/`SPR` and is driven by an error-corrected reconciliation loop

mod ingka;
mod iows;
mod pip;

pub use ingka::{handle_ingka_error, IngkaItems, MAX_BATCH_SIZE};
pub use iows::{IowsItems, IowsItemsEndpoint, ItemKind};
pub use pip::{PipItem, PipItemEndpoint};
