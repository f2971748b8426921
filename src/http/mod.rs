//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, single watchlist route)
//!     → request.rs (request ID, parameter extraction)
//!     → watchlist service (typed request → store calls)
//!     → response.rs (outcome or error envelope)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{extract_query, MakeRequestUuidV4, ParseError, X_REQUEST_ID};
pub use response::ErrorBody;
pub use server::{AppState, HttpServer, ServerError};
