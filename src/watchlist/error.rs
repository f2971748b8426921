//! Errors that end a watchlist request.

use axum::http::StatusCode;
use thiserror::Error;

use crate::http::request::ParseError;
use crate::store::{LocateError, StoreError};

/// Every way a watchlist request can fail.
///
/// The `Display` text is exactly what the client receives in the
/// `{"error": ...}` envelope; underlying causes stay in `source()`.
#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("could not parse request body")]
    Parse(#[from] ParseError),

    #[error("invalid action")]
    InvalidAction,

    #[error("no db specified, create a new one first")]
    NoDbForAdd,

    #[error("no db specified")]
    MissingDb,

    #[error("no id specified")]
    MissingId,

    #[error("no title specified")]
    MissingTitle,

    #[error("invalid db reference")]
    InvalidDb(#[from] LocateError),

    #[error("entry with id already exists")]
    DuplicateId,

    #[error("entry with id not found")]
    NotFound,

    #[error("could not create db")]
    Create(#[source] StoreError),

    #[error("could not fetch db")]
    Fetch(#[source] StoreError),

    #[error("could not update db")]
    Update(#[source] StoreError),
}

impl WatchlistError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WatchlistError::Create(_) | WatchlistError::Fetch(_) | WatchlistError::Update(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(WatchlistError::InvalidAction.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(WatchlistError::NotFound.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            WatchlistError::Fetch(StoreError::MissingLocation).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_hides_cause() {
        let err = WatchlistError::Update(StoreError::Status(StatusCode::BAD_GATEWAY));
        assert_eq!(err.to_string(), "could not update db");
        assert!(std::error::Error::source(&err).is_some());
    }
}
