//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated table → controllers + filters → bound into Router
//!
//! Reload (reload.rs):
//!     Watcher update → new registration bound → old one unbound
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast → reloader stops
//! ```
//!
//! # Design Decisions
//! - Ordered binding: controllers first, then filters
//! - A failed reload leaves the current registration bound

pub mod reload;
pub mod shutdown;
pub mod startup;

pub use reload::Reloader;
pub use shutdown::Shutdown;
pub use startup::{ConfiguredController, Registration};
