//! HTTP vocabulary and dispatch.
//!
//! # Data Flow
//! ```text
//! HTTP front-end (owns sockets, out of this crate)
//!     → dispatch.rs (route lookup, filter chain, action)
//!     → request.rs (context: method, path, parameters, attributes)
//!     → response.rs (status + body handed back to the front-end)
//! ```

pub mod dispatch;
pub mod method;
pub mod request;
pub mod response;

pub use dispatch::{Dispatch, Dispatcher};
pub use method::{HttpMethod, MethodParseError};
pub use request::RequestContext;
pub use response::Outcome;
