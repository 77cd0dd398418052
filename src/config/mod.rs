//! Route table configuration subsystem.
//!
//! # Data Flow
//! ```text
//! route table file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, templates compiled once)
//!     → RouterConfig (validated, immutable)
//!     → lifecycle::startup (controllers and filters bound into a Router)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new table
//!     → validation.rs validates
//!     → lifecycle::reload swaps the bound registration
//! ```
//!
//! # Design Decisions
//! - A table is immutable once loaded; changes require a full reload
//! - All fields have defaults to allow minimal tables
//! - An invalid reload keeps the current table in place

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ActionConfig, ControllerConfig, FilterConfig, LogFormat, LoggingConfig, ResponseConfig,
    RouterConfig,
};
pub use validation::ValidationError;
