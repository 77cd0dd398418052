//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Controller bound:
//!     controller.rs (declared RouteSpec[])
//!     → builder.rs (compile template, resolve action)
//!     → pattern.rs (template → anchored regex + parameter table)
//!     → router.rs (append to a new snapshot, publish atomically)
//!
//! Incoming (method, path):
//!     → router.rs (scan snapshot in registration order)
//!     → route.rs (matched Route or the unbound sentinel)
//!
//! Filters bound:
//!     → filter.rs (identity through delegation, priority order)
//!     → router.rs (deduplicated, ordered FilterSet)
//! ```
//!
//! # Design Decisions
//! - Templates compiled at bind time, never per request
//! - Lookups are lock-free reads of an immutable snapshot
//! - Deterministic: first registered match wins
//! - No match is a value, not an error

pub mod builder;
pub mod controller;
pub mod filter;
pub mod pattern;
pub mod route;
pub mod router;

pub use builder::{RouteBuilder, RouteError};
pub use controller::{same_controller, Action, ActionError, Controller, RouteSpec};
pub use filter::{applies_to, whole_path, DelegatingFilter, Filter, FilterId, FilterSet, FnFilter};
pub use pattern::{Parameter, ParameterKind, RoutePattern, TemplateError};
pub use route::Route;
pub use router::Router;
