//! REST routing service.
//!
//! ```text
//!     Client Request
//!         → http server (request id, trace, timeout, panic capture)
//!         → routing::RouteTable (listener pattern → handler class)
//!         → dispatch (verb, method selection, params, body decoding)
//!         → handler
//!         → http::response (JSON document or error envelope)
//!     Client Response
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::net::TcpListener;

use rest_router::api::{Api, HttpVerb, MethodDescriptor};
use rest_router::config::{load_config, validate_config, ConfigError, ServiceConfig};
use rest_router::lifecycle::{spawn_signal_listener, Shutdown};
use rest_router::observability::{logging, metrics};
use rest_router::resource::{RequestContext, Resource};
use rest_router::routing::ConfigurationError;
use rest_router::{RestError, RestService, RouteTable};

#[derive(Parser)]
#[command(name = "rest-router")]
#[command(about = "Declarative REST routing service", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener port.
    #[arg(short, long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST listener (default)
    Serve,
    /// Print the compiled route table and exit
    Routes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let resources = demo_resources()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Routes => print_routes(resources),
        Commands::Serve => serve(config, resources).await?,
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<ServiceConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(port) = cli.port {
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{host}:{port}");
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

async fn serve(
    config: ServiceConfig,
    resources: Vec<Resource>,
) -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging(&config.observability)?;
    tracing::info!("rest-router v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_size = config.limits.max_body_size,
        serve_traceback = config.debug.serve_traceback,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let service = RestService::new(config, resources);
    let listener = TcpListener::bind(&bind_address).await?;

    let shutdown = Shutdown::new();
    let stop = shutdown.subscribe();
    spawn_signal_listener(shutdown);

    service.run(listener, stop).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn print_routes(resources: Vec<Resource>) {
    let table = RouteTable::build(resources);
    for entry in table.entries() {
        for method in entry.resource.methods() {
            if method.compiled_path().listener_pattern() != entry.pattern {
                continue;
            }
            println!(
                "{:<40} {:<7} {:<32} {}",
                entry.pattern.to_string(),
                method.descriptor().http_verb(),
                method.method_id(),
                method.compiled_path()
            );
        }
    }
}

/// Resources served by this binary.
fn demo_resources() -> Result<Vec<Resource>, ConfigurationError> {
    let atl = Api::new("atl", "v1");

    let check = Resource::builder(
        "CheckHandler",
        atl.api_class().resource_name("test").path("epg"),
    )
    .method(
        MethodDescriptor::builder("test")
            .name("list")
            .path("check/{check_id}/app/{id}")
            .http_method(HttpVerb::Get),
        |_ctx: RequestContext, params: Vec<String>| async move {
            match params.as_slice() {
                [check_id, app_id] => Ok(json!({ "hello": check_id, "world": app_id })),
                _ => Err(RestError::BadRequest("Expected check and app ids".into())),
            }
        },
    )
    .build()?;

    Ok(vec![check])
}
