//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / dispatch / lifecycle produce:
//!     → tracing events (structured fields: method, path, uri, controller)
//!     → metrics.rs (lookup counters, registry gauges)
//!
//! The binary consumes:
//!     → logging.rs (subscriber setup, pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Metrics are cheap (facade calls, no-op without a recorder)

pub mod logging;
pub mod metrics;
