//! Watchlist gateway library.
//!
//! An HTTP front for watchlists kept in a remote JSON document store. One
//! route accepts `action=new|add|remove`; every call reads the remote
//! document, applies the change, and writes it back.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod store;
pub mod watchlist;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
