//! Outcome of a dispatched request.
//!
//! # Responsibilities
//! - Carry the status code and body produced by an action or a filter
//! - Provide the "not found" outcome for unbound routes
//!
//! # Design Decisions
//! - Transport-agnostic: the HTTP front-end owns serialization
//! - Status kept as a plain `u16`; range is checked when loading config

use serde::Serialize;

/// Status and body returned by an action or a short-circuiting filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub status: u16,
    pub body: String,
}

impl Outcome {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// 404, returned for unbound routes.
    pub fn not_found() -> Self {
        Self::new(404, "No matching route found")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
