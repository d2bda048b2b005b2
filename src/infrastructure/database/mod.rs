pub mod entities;
pub mod migrator;
pub mod repositories;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

pub use repositories::{
    EntityMapping, SeaOrmProductRepository, SeaOrmRepository, SeaOrmRepositoryProvider,
};

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./catalog.db?mode=rwc")
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./catalog.db?mode=rwc".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
        }
    }

    /// Private SQLite database that lives as long as the connection pool
    pub fn sqlite_in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
        }
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);

    let mut options = ConnectOptions::new(config.url.clone());
    options.sqlx_logging(false);
    if config.is_in_memory() {
        // Every SQLite connection gets its own in-memory database.
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    info!("Database connected successfully");
    Ok(db)
}

#[cfg(test)]
pub(crate) mod testing {
    use sea_orm::DatabaseConnection;
    use sea_orm_migration::MigratorTrait;

    use super::migrator::Migrator;
    use super::{init_database, DatabaseConfig};

    /// Fresh, migrated in-memory database.
    pub async fn migrated_db() -> DatabaseConnection {
        let db = init_database(&DatabaseConfig::sqlite_in_memory())
            .await
            .expect("connect");
        Migrator::up(&db, None).await.expect("migrate");
        db
    }
}
