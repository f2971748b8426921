//! Watchlist operations against a document store.
//!
//! Every call is a self-contained read-modify-write of one remote document.
//! Nothing is cached between calls, and two concurrent writers of the same
//! document can lose each other's update.

use url::Url;

use crate::store::{DocumentLocator, DocumentStore};
use crate::watchlist::error::WatchlistError;
use crate::watchlist::params::WatchlistRequest;
use crate::watchlist::types::Entry;

/// Successful result of a watchlist request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new document exists at this URL.
    Created(Url),
    Added,
    Removed,
}

/// Applies watchlist requests to a [`DocumentStore`].
pub struct WatchlistService<S> {
    store: S,
    locator: DocumentLocator,
}

impl<S: DocumentStore> WatchlistService<S> {
    pub fn new(store: S, locator: DocumentLocator) -> Self {
        Self { store, locator }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn execute(&self, request: WatchlistRequest) -> Result<Outcome, WatchlistError> {
        tracing::debug!(action = request.action(), "Executing watchlist request");
        match request {
            WatchlistRequest::New => self.create_list().await.map(Outcome::Created),
            WatchlistRequest::Add { db, entry } => {
                self.add_entry(&db, entry).await.map(|()| Outcome::Added)
            }
            WatchlistRequest::Remove { db, id } => {
                self.remove_entry(&db, &id).await.map(|_| Outcome::Removed)
            }
        }
    }

    pub async fn create_list(&self) -> Result<Url, WatchlistError> {
        let url = self.store.create().await.map_err(WatchlistError::Create)?;
        tracing::info!(db = %url, "Created watchlist");
        Ok(url)
    }

    pub async fn add_entry(&self, db: &str, entry: Entry) -> Result<(), WatchlistError> {
        let url = self.locator.resolve(db)?;
        let mut list = self.store.fetch(&url).await.map_err(WatchlistError::Fetch)?;

        let id = entry.id.clone();
        if !list.push_unique(entry) {
            return Err(WatchlistError::DuplicateId);
        }

        self.store
            .replace(&url, &list)
            .await
            .map_err(WatchlistError::Update)?;
        tracing::info!(db = %url, id = %id, entries = list.len(), "Added entry");
        Ok(())
    }

    pub async fn remove_entry(&self, db: &str, id: &str) -> Result<Entry, WatchlistError> {
        let url = self.locator.resolve(db)?;
        let mut list = self.store.fetch(&url).await.map_err(WatchlistError::Fetch)?;

        let removed = list.remove(id).ok_or(WatchlistError::NotFound)?;

        self.store
            .replace(&url, &list)
            .await
            .map_err(WatchlistError::Update)?;
        tracing::info!(db = %url, id = %id, entries = list.len(), "Removed entry");
        Ok(removed)
    }
}
