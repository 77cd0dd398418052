//! Request routing library.
//!
//! Maps `(method, path)` pairs to controller actions through compiled URI
//! templates, and keeps a priority-ordered set of filters that run around them.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::{Dispatcher, HttpMethod, Outcome, RequestContext};
pub use lifecycle::Shutdown;
pub use routing::{Controller, Filter, Route, RouteBuilder, RoutePattern, Router};
