//! Watchlist domain.
//!
//! # Data Flow
//! ```text
//! Query (flat string map from the HTTP layer)
//!     → params.rs (typed WatchlistRequest: New | Add | Remove)
//!     → service.rs (fetch → mutate → replace through a DocumentStore)
//!     → Outcome or WatchlistError
//! ```

pub mod error;
pub mod params;
pub mod service;
pub mod types;

pub use error::WatchlistError;
pub use params::{Query, WatchlistRequest};
pub use service::{Outcome, WatchlistService};
pub use types::{Entry, WatchList};
