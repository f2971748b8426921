//! Remote document store integration.
//!
//! # Responsibilities
//! - Define the `DocumentStore` seam used by the watchlist service
//! - Talk to a jsonblob-style HTTP store (`client.rs`)
//! - Turn client-supplied `db` references into document URLs (`locator.rs`)

pub mod client;
pub mod locator;
pub mod types;

pub use client::JsonBlobStore;
pub use locator::{DocumentLocator, LocateError};
pub use types::{DocumentStore, StoreError, StoreResult};
