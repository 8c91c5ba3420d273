//! Core library for the `atmosphere` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The Weatherstack client (current, historical and marine conditions)
//! - Shared domain models and per-tab request state
//! - Presentation helpers: condition glyphs and local-time formatting
//!
//! It is used by `atmosphere-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod geo;
pub mod glyph;
pub mod model;
pub mod provider;
pub mod state;
pub mod timefmt;

pub use config::Config;
pub use error::{FetchError, NetworkError, ProviderError};
pub use model::{CurrentConditions, HistoricalDay, HistoricalResponse, MarineConditions};
pub use provider::{Endpoint, Transport, weatherstack::WeatherstackClient};
pub use state::{Dashboard, RequestState, Tab};
