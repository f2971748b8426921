//! Store error definitions and the store abstraction.

use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::watchlist::WatchList;

/// Errors that can occur talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection, timeout, or body transfer failed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store returned status {0}")]
    Status(reqwest::StatusCode),

    /// The document body is not a valid watchlist.
    #[error("invalid document: {0}")]
    Decode(#[from] serde_json::Error),

    /// A create response did not say where the document lives.
    #[error("create response has no usable Location header")]
    MissingLocation,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The three operations the gateway needs from a remote JSON document store.
pub trait DocumentStore: Send + Sync + 'static {
    /// Create an empty document and return its URL.
    fn create(&self) -> impl Future<Output = StoreResult<Url>> + Send;

    /// Fetch and decode the document at `url`.
    fn fetch(&self, url: &Url) -> impl Future<Output = StoreResult<WatchList>> + Send;

    /// Replace the document at `url` with `list`.
    fn replace(&self, url: &Url, list: &WatchList) -> impl Future<Output = StoreResult<()>> + Send;
}

impl<T: DocumentStore> DocumentStore for Arc<T> {
    fn create(&self) -> impl Future<Output = StoreResult<Url>> + Send {
        (**self).create()
    }

    fn fetch(&self, url: &Url) -> impl Future<Output = StoreResult<WatchList>> + Send {
        (**self).fetch(url)
    }

    fn replace(&self, url: &Url, list: &WatchList) -> impl Future<Output = StoreResult<()>> + Send {
        (**self).replace(url, list)
    }
}
