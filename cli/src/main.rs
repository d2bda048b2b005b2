//! Pagination Flow CLI server
//!
//! ```sh
//! # Run with default config (~/.config/pagination-flow/config.toml)
//! pagination-flow
//!
//! # Custom config path and port
//! pagination-flow --config /etc/pagination-flow/config.toml --port 8081
//!
//! # Throwaway catalog without a database file
//! pagination-flow --memory
//!
//! # Validate config without starting
//! pagination-flow --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use pagination_flow::config::{AppConfig, DatabaseBackend};
use pagination_flow::server::{init_tracing, ServerHandle, ServerOptions};

/// Product catalog with page-based listing over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "pagination-flow",
    version,
    about = "Paginated product catalog server",
    long_about = "REST API serving a product catalog one page at a time.\n\n\
                  Default config: ~/.config/pagination-flow/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "PAGINATION_FLOW_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Use the in-memory backend regardless of the config file.
    #[arg(long)]
    memory: bool,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Do not insert demo products into an empty catalog.
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(pagination_flow::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.memory {
        config.database.backend = DatabaseBackend::Memory;
    }

    if cli.check {
        return match load_error.map(Err).unwrap_or_else(|| config.validate()) {
            Ok(()) => {
                println!("Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   Address     : {}", config.server.address());
                println!("   Backend     : {:?}", config.database.backend);
                println!("   Database    : {}", config.database.connection_url());
                println!("   Page size   : {}", config.catalog.page_size);
                println!("   Log level   : {}", config.logging.level);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Invalid configuration in {}: {}", config_path.display(), e);
                ExitCode::FAILURE
            }
        };
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    let seed = config.catalog.seed_demo_products && !cli.no_seed;
    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        seed_demo_products: seed,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.wait().await;
    ExitCode::SUCCESS
}
