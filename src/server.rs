//! Catalog server runtime
//!
//! [`ServerHandle`] owns the whole lifecycle: metrics recorder, storage
//! backend, migrations, demo seed data, the HTTP listener and graceful
//! shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::config::{AppConfig, DatabaseBackend};
use crate::domain::{DomainResult, NewProduct, RepositoryProvider};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, InMemoryRepositoryProvider, SeaOrmRepositoryProvider};
use crate::interfaces::http::modules::metrics::install_prometheus_recorder;
use crate::interfaces::{create_api_router, AppState};
use crate::support::{AppError, InfraError, ShutdownCoordinator, ShutdownSignal};

/// Options for starting the catalog server.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Insert the demo catalog when the store is empty (default: from config).
    pub seed_demo_products: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        let config = AppConfig::default();
        Self {
            seed_demo_products: config.catalog.seed_demo_products,
            config,
            auto_migrate: true,
        }
    }
}

impl From<AppConfig> for ServerOptions {
    fn from(config: AppConfig) -> Self {
        Self {
            seed_demo_products: config.catalog.seed_demo_products,
            config,
            auto_migrate: true,
        }
    }
}

/// Handle to a running catalog server.
pub struct ServerHandle {
    /// Repository provider the routes use
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with
    pub config: AppConfig,
    /// Bound address; differs from the config when port 0 was requested
    pub local_addr: SocketAddr,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the server:
    ///
    /// 1. Install the Prometheus recorder
    /// 2. Open the configured backend and run migrations
    /// 3. Seed demo products into an empty catalog (if enabled)
    /// 4. Serve the REST API with Swagger UI
    pub async fn start(opts: ServerOptions) -> Result<Self, AppError> {
        let config = opts.config;
        config.validate()?;

        info!("Starting catalog server...");

        let prometheus_handle = install_prometheus_recorder()?;
        info!("Prometheus metrics recorder ready");

        let (repos, db): (Arc<dyn RepositoryProvider>, Option<DatabaseConnection>) =
            match config.database.backend {
                DatabaseBackend::Sqlite => {
                    let db_config = config.database.to_database_config();
                    let db = init_database(&db_config)
                        .await
                        .map_err(InfraError::from)?;

                    if opts.auto_migrate {
                        info!("Running database migrations...");
                        Migrator::up(&db, None).await.map_err(InfraError::from)?;
                        info!("Migrations completed");
                    }

                    (Arc::new(SeaOrmRepositoryProvider::new(db.clone())), Some(db))
                }
                DatabaseBackend::Memory => {
                    info!("Using in-memory catalog; data is lost on exit");
                    (Arc::new(InMemoryRepositoryProvider::new()), None)
                }
            };

        if opts.seed_demo_products {
            let seeded = seed_demo_products(repos.as_ref()).await?;
            if seeded > 0 {
                info!("Seeded {} demo products", seeded);
            }
        }

        let router = create_api_router(AppState {
            repos: Arc::clone(&repos),
            db: db.clone(),
            page_size: config.catalog.page_size,
            metrics: Some(prometheus_handle),
        });

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let listener = tokio::net::TcpListener::bind(config.server.address())
            .await
            .map_err(InfraError::from)?;
        let local_addr = listener.local_addr().map_err(InfraError::from)?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            shutdown_signal.wait().await;
            info!("REST API received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install SIGTERM/SIGINT listeners that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Block until shutdown is triggered and in-flight requests drain.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            mut api_task,
            ..
        } = self;

        let drained = shutdown
            .drain(async {
                if let Err(e) = (&mut api_task).await {
                    error!("REST API task panicked: {}", e);
                }
            })
            .await;

        if !drained {
            api_task.abort();
        }

        if let Some(db) = db {
            match db.close().await {
                Ok(()) => info!("Database connection closed"),
                Err(e) => warn!("Error closing database connection: {}", e),
            }
        }

        info!("Catalog server shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down catalog server...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// (name, description, price in cents)
const DEMO_PRODUCTS: &[(&str, &str, i64)] = &[
    ("Oak Desk", "Solid oak writing desk", 34900),
    ("Desk Lamp", "Adjustable LED lamp", 3999),
    ("Office Chair", "Mesh back, lumbar support", 18900),
    ("Bookshelf", "Five shelves, walnut finish", 12900),
    ("Monitor Stand", "Bamboo riser with drawer", 4599),
    ("Notebook", "A5 dotted, 160 pages", 1299),
    ("Fountain Pen", "Steel nib, medium", 2850),
    ("Ink Bottle", "Blue-black, 50 ml", 1100),
    ("Desk Mat", "Felt, 90 x 40 cm", 2499),
    ("Cable Tray", "Under-desk mount", 1999),
    ("Wall Clock", "Silent sweep movement", 3450),
    ("Coat Rack", "Freestanding, six hooks", 5900),
    ("Footrest", "Tilting, textured surface", 2799),
    ("Whiteboard", "Magnetic, 90 x 60 cm", 6499),
    ("Marker Set", "Eight colours, fine tip", 899),
    ("Paper Tray", "Stackable, three tiers", 1899),
    ("Stapler", "Full strip, 25 sheets", 1450),
    ("Filing Cabinet", "Three drawers, lockable", 15900),
    ("Plant Pot", "Ceramic, 15 cm", 1699),
    ("Headphone Hook", "Clamp-on aluminium", 1250),
    ("Laptop Sleeve", "Wool felt, 14 inch", 3299),
    ("Webcam Cover", "Slide shutter, pack of 3", 599),
    ("USB Hub", "Seven ports, powered", 3899),
    ("Keyboard", "Tenkeyless, brown switches", 8900),
    ("Mouse Pad", "Cloth, stitched edges", 999),
];

/// Insert the demo catalog when the store holds no products.
///
/// Returns how many products were inserted.
pub async fn seed_demo_products(repos: &dyn RepositoryProvider) -> DomainResult<usize> {
    let repository = repos.products();
    let existing = repository.get_paged(1, 1).await?.total_items;
    if existing > 0 {
        info!("Catalog already has {} products, skipping demo seed", existing);
        return Ok(0);
    }

    let now = Utc::now();
    for (name, description, price) in DEMO_PRODUCTS {
        repository.add(
            NewProduct {
                name: name.to_string(),
                description: Some(description.to_string()),
                price: *price,
                currency: "USD".to_string(),
            }
            .into_product(now),
        );
    }

    Ok(repository.save().await?.inserted.len())
}

/// Initialize tracing from the application config.
///
/// `RUST_LOG` takes precedence over `logging.level`. Call once at process
/// startup, before [`ServerHandle::start`].
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {}", e);
    }
}
