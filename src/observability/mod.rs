//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and store client produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! Request IDs are attached by the HTTP layer and show up in every log line
//! emitted while handling that request.

pub mod logging;
pub mod metrics;
