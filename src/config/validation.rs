//! Route table validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference declared actions)
//! - Compile every template and filter pattern once
//! - Validate value ranges (status codes, log directive)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before a table is bound into a router

use std::collections::HashSet;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::RouterConfig;
use crate::routing::RoutePattern;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("duplicate controller name `{0}`")]
    DuplicateController(String),

    #[error("controller `{controller}` declares action `{action}` more than once")]
    DuplicateAction { controller: String, action: String },

    #[error("controller `{controller}` routes {route} to unknown action `{action}`")]
    UnknownAction {
        controller: String,
        route: String,
        action: String,
    },

    #[error("controller `{controller}`: {reason}")]
    InvalidTemplate { controller: String, reason: String },

    #[error("duplicate filter name `{0}`")]
    DuplicateFilter(String),

    #[error("filter `{filter}` has an invalid uri pattern: {reason}")]
    InvalidFilterPattern { filter: String, reason: String },

    #[error("{owner} uses status {status}, outside 100..=599")]
    InvalidStatus { owner: String, status: u16 },

    #[error("invalid log level `{level}`: {reason}")]
    InvalidLogLevel { level: String, reason: String },
}

/// Validate a parsed route table.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = EnvFilter::try_new(&config.logging.level) {
        errors.push(ValidationError::InvalidLogLevel {
            level: config.logging.level.clone(),
            reason: e.to_string(),
        });
    }

    let mut controller_names = HashSet::new();
    for controller in &config.controllers {
        if !controller_names.insert(controller.name.as_str()) {
            errors.push(ValidationError::DuplicateController(controller.name.clone()));
        }

        let mut actions = HashSet::new();
        for action in &controller.actions {
            if !actions.insert(action.name.as_str()) {
                errors.push(ValidationError::DuplicateAction {
                    controller: controller.name.clone(),
                    action: action.name.clone(),
                });
            }
            check_status(
                &mut errors,
                format!("action `{}` of controller `{}`", action.name, controller.name),
                action.status,
            );
        }

        for route in &controller.routes {
            if let Err(e) = RoutePattern::compile(&route.uri) {
                errors.push(ValidationError::InvalidTemplate {
                    controller: controller.name.clone(),
                    reason: e.to_string(),
                });
            }
            if !actions.contains(route.action.as_str()) {
                errors.push(ValidationError::UnknownAction {
                    controller: controller.name.clone(),
                    route: format!("{} {}", route.method, route.uri),
                    action: route.action.clone(),
                });
            }
        }
    }

    let mut filter_names = HashSet::new();
    for filter in &config.filters {
        if !filter_names.insert(filter.name.as_str()) {
            errors.push(ValidationError::DuplicateFilter(filter.name.clone()));
        }
        if let Err(e) = filter.compile_uri() {
            errors.push(ValidationError::InvalidFilterPattern {
                filter: filter.name.clone(),
                reason: e.to_string(),
            });
        }
        if let Some(respond) = &filter.respond {
            check_status(&mut errors, format!("filter `{}`", filter.name), respond.status);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_status(errors: &mut Vec<ValidationError>, owner: String, status: u16) {
    if !(100..=599).contains(&status) {
        errors.push(ValidationError::InvalidStatus { owner, status });
    }
}
