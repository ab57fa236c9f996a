//! Startup Catalog Server
//!
//! REST API over a SQLite catalog of startup companies and their products,
//! plus the bulk loader that imports generated datasets.

mod error;
mod extractors;
mod handlers;
mod services;
mod settings;
mod storage;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use services::{CatalogService, DataLoader};
use settings::ServerConfig;
use storage::Database;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub catalog: Arc<CatalogService>,
    pub loader: Arc<DataLoader>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Arc<Database>, config: ServerConfig) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(db.clone())),
            loader: Arc::new(DataLoader::new(db.clone())),
            config: Arc::new(config),
            db,
        }
    }
}

#[derive(Parser)]
#[command(name = "startup-server")]
#[command(author, version, about = "Startup company catalog REST API", long_about = None)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, env = "STARTUP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Import a dataset file into the database and print the summary
    Load {
        /// Dataset file, defaults to the configured data_file
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let cli = Cli::parse();

    let config = match ServerConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[FATAL] Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(&config) {
        eprintln!("[FATAL] {:#}", e);
        std::process::exit(1);
    }

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::Load { file } => run_load(config, file).await,
    };

    if let Err(e) = result {
        error!("Fatal: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so command output on stdout stays machine readable.
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(config: &ServerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("Invalid log level: {}", config.log_level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

async fn run_server(config: ServerConfig) -> Result<()> {
    info!(
        "Starting Startup Catalog Server v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "Config loaded: bind={}, db={}, data_file={}",
        config.bind_address,
        config.database_path,
        config.data_file.display()
    );

    let addr = config.socket_addr()?;

    let db = Arc::new(
        Database::new(&config.database_path)
            .await
            .context("Failed to initialize database")?,
    );

    let app = build_router(AppState::new(db.clone(), config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

async fn run_load(config: ServerConfig, file: Option<PathBuf>) -> Result<()> {
    let path = file.unwrap_or_else(|| config.data_file.clone());

    let db = Arc::new(
        Database::new(&config.database_path)
            .await
            .context("Failed to initialize database")?,
    );

    let summary = DataLoader::new(db)
        .load_file(&path)
        .await
        .with_context(|| format!("Failed to load {}", path.display()))?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/load-data", post(handlers::load::load_data))
        .route(
            "/companies",
            get(handlers::companies::list).post(handlers::companies::create),
        )
        .route(
            "/companies/:id",
            get(handlers::companies::get)
                .put(handlers::companies::update)
                .delete(handlers::companies::delete),
        )
        .route(
            "/products",
            get(handlers::products::list).post(handlers::products::create),
        )
        .route(
            "/products/:id",
            get(handlers::products::get)
                .put(handlers::products::update)
                .delete(handlers::products::delete),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
