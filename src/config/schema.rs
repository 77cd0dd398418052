//! Route table schema.
//!
//! This module defines the route table file: configured controllers, their
//! actions and routes, filters, and logging. All types derive Serde traits for
//! deserialization from TOML.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::routing::filter::whole_path;
use crate::routing::RouteSpec;

/// Root of a route table file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Logging settings for the binary.
    pub logging: LoggingConfig,

    /// Controllers and the routes they declare, in binding order.
    pub controllers: Vec<ControllerConfig>,

    /// Filters layered around every dispatch.
    pub filters: Vec<FilterConfig>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. "info" or "request_router=debug".
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// A controller defined by the route table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerConfig {
    /// Unique controller name, used in logs.
    pub name: String,

    /// Actions and the fixed response each one produces.
    #[serde(default)]
    pub actions: Vec<ActionConfig>,

    /// Routes mapping requests to the actions above.
    #[serde(default)]
    pub routes: Vec<RouteSpec>,
}

/// A configured action.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActionConfig {
    pub name: String,

    #[serde(default = "default_status")]
    pub status: u16,

    #[serde(default)]
    pub body: String,
}

/// A configured filter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Unique filter name, used in logs.
    pub name: String,

    /// Path regex, anchored at both ends when compiled. Absent = every path.
    #[serde(default)]
    pub uri: Option<String>,

    /// Higher runs first.
    #[serde(default)]
    pub priority: i32,

    /// Response that short-circuits the request. Absent = pass through.
    #[serde(default)]
    pub respond: Option<ResponseConfig>,
}

impl FilterConfig {
    /// Compile `uri` into an anchored regex.
    pub fn compile_uri(&self) -> Result<Option<Regex>, regex::Error> {
        self.uri.as_deref().map(whole_path).transpose()
    }
}

/// A fixed response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResponseConfig {
    #[serde(default = "default_status")]
    pub status: u16,

    #[serde(default)]
    pub body: String,
}

fn default_status() -> u16 {
    200
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    #[test]
    fn test_defaults() {
        let config: RouterConfig = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.controllers.is_empty());
        assert!(config.filters.is_empty());
    }

    #[test]
    fn test_parse_table() {
        let config: RouterConfig = toml::from_str(
            r#"
            [logging]
            format = "json"

            [[controllers]]
            name = "users"
            actions = [{ name = "show", body = "user" }]
            routes = [{ method = "GET", uri = "/users/{id}", action = "show" }]

            [[filters]]
            name = "maintenance"
            uri = "/admin/.*"
            priority = 10
            respond = { status = 503 }
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
        let users = &config.controllers[0];
        assert_eq!(users.actions[0].status, 200);
        assert_eq!(users.routes[0], RouteSpec::new(HttpMethod::Get, "/users/{id}", "show"));

        let filter = &config.filters[0];
        assert_eq!(filter.respond.as_ref().map(|r| r.status), Some(503));
        let uri = filter.compile_uri().unwrap().unwrap();
        assert!(uri.is_match("/admin/x"));
        assert!(!uri.is_match("/public/admin/x"));
    }
}
