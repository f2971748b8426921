//! Response construction.
//!
//! # Responsibilities
//! - Map watchlist errors to status codes and the `{"error": ...}` envelope
//! - Render successful outcomes (`new` → plain URL, `add` → status JSON,
//!   `remove` → empty 200)

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::watchlist::{Outcome, WatchlistError};

/// JSON error envelope returned for every failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: &'static str,
}

impl IntoResponse for WatchlistError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            let cause = std::error::Error::source(&self)
                .map(ToString::to_string)
                .unwrap_or_default();
            tracing::error!(error = %self, cause = %cause, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Created(url) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                url.to_string(),
            )
                .into_response(),
            Outcome::Added => (StatusCode::OK, Json(StatusBody { status: "ok" })).into_response(),
            Outcome::Removed => StatusCode::OK.into_response(),
        }
    }
}
