//! Router metrics.
//!
//! # Metrics
//! - `router_lookups_total` (counter): lookups by outcome (`hit`, `miss`)
//! - `router_routes_rejected_total` (counter): declared routes that failed to build
//! - `router_routes_bound` (gauge): routes in the current snapshot
//! - `router_filters_bound` (gauge): filters in the current snapshot
//! - `router_dispatch_total` (counter): dispatched requests by status
//!
//! # Design Decisions
//! - Uses the `metrics` facade only; the embedding application installs a recorder
//! - Without a recorder every call is a no-op

use ::metrics::{counter, gauge};

pub fn record_lookup(matched: bool) {
    let outcome = if matched { "hit" } else { "miss" };
    counter!("router_lookups_total", "outcome" => outcome).increment(1);
}

pub fn record_rejected_route() {
    counter!("router_routes_rejected_total").increment(1);
}

pub fn record_registry_size(routes: usize, filters: usize) {
    gauge!("router_routes_bound").set(routes as f64);
    gauge!("router_filters_bound").set(filters as f64);
}

pub fn record_dispatch(status: u16) {
    counter!("router_dispatch_total", "status" => status.to_string()).increment(1);
}
