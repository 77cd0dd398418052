//! request-router
//!
//! Command line front-end over a TOML route table.
//!
//! ```text
//!   route table ──▶ config (load + validate) ──▶ lifecycle (bind)
//!                                                     │
//!                                                     ▼
//!   (METHOD, PATH) ──────────────────────────▶ http::Dispatcher ──▶ routing::Router
//!                                                     │
//!                                                     ▼
//!                                          filters, then the action
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

use request_router::config::watcher::ConfigWatcher;
use request_router::config::{load_config, RouterConfig};
use request_router::lifecycle::{Registration, Reloader};
use request_router::observability::logging;
use request_router::{Dispatcher, HttpMethod, Router, Shutdown};

#[derive(Parser)]
#[command(name = "request-router")]
#[command(about = "Resolve requests against a route table", long_about = None)]
struct Cli {
    /// Log filter, overrides the route table's logging level.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a route table
    Check { config: PathBuf },
    /// Dispatch one request and print the outcome
    Resolve {
        config: PathBuf,
        method: HttpMethod,
        path: String,
    },
    /// Print the bound route table
    Routes { config: PathBuf },
    /// Bind a route table and reload it on change until Ctrl+C
    Watch { config: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let log_level = cli.log_level.as_deref();

    match cli.command {
        Commands::Check { config } => {
            let config = load(&config, log_level)?;
            for controller in &config.controllers {
                for route in &controller.routes {
                    println!("{:<8}{:<40}{}.{}", route.method, route.uri, controller.name, route.action);
                }
            }
            for filter in &config.filters {
                println!(
                    "filter  {:<40}{} (priority {})",
                    filter.uri.as_deref().unwrap_or("*"),
                    filter.name,
                    filter.priority
                );
            }
            println!("OK");
        }
        Commands::Resolve { config, method, path } => {
            let config = load(&config, log_level)?;
            let router = bind(&config);
            let dispatch = Dispatcher::new(router).dispatch(method, &path);

            let route = (!dispatch.route.is_unbound()).then(|| {
                json!({
                    "method": dispatch.route.method(),
                    "uri": dispatch.route.uri(),
                    "controller": dispatch.route.controller().map(|c| c.name().to_string()),
                    "action": dispatch.route.action_name(),
                })
            });
            let report = json!({
                "status": dispatch.outcome.status,
                "body": dispatch.outcome.body,
                "route": route,
                "parameters": dispatch.context.parameters(),
                "short_circuited": dispatch.short_circuited_by.is_some(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Routes { config } => {
            let config = load(&config, log_level)?;
            let router = bind(&config);

            let routes: Vec<_> = router
                .routes()
                .iter()
                .map(|route| {
                    json!({
                        "method": route.method(),
                        "uri": route.uri(),
                        "controller": route.controller().map(|c| c.name().to_string()),
                        "action": route.action_name(),
                    })
                })
                .collect();
            let filters: Vec<_> = router
                .filters()
                .iter()
                .map(|filter| {
                    json!({
                        "uri": filter.uri().map(|re| re.as_str().to_string()),
                        "priority": filter.priority(),
                    })
                })
                .collect();

            let report = json!({ "routes": routes, "filters": filters });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Watch { config: path } => {
            let config = load(&path, log_level)?;
            let router = Arc::new(Router::new());
            let reloader = Reloader::start(router.clone(), &config);

            let (watcher, updates) = ConfigWatcher::new(&path);
            let _watch_handle = watcher.run()?;

            let shutdown = Shutdown::new();
            let reload_task = tokio::spawn(reloader.run(updates, shutdown.subscribe()));

            tracing::info!(
                path = ?path,
                routes = router.routes().len(),
                filters = router.filters().len(),
                "Watching route table"
            );

            shutdown.on_ctrl_c().await;
            reload_task.await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}

/// Load the route table and install logging from it.
fn load(path: &Path, log_level: Option<&str>) -> Result<RouterConfig, Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    logging::init(&config.logging, log_level)?;

    tracing::info!(
        path = ?path,
        controllers = config.controllers.len(),
        filters = config.filters.len(),
        "Route table loaded"
    );
    Ok(config)
}

fn bind(config: &RouterConfig) -> Arc<Router> {
    let router = Arc::new(Router::new());
    Registration::from_config(config).bind(&router);
    router
}
