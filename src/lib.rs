//! # Pagination Flow
//!
//! Product catalog served over HTTP with page-based listing.
//!
//! ## Architecture
//!
//! - **domain**: products, the paged result container and the generic
//!   `Repository<T>` contract with its unit of work
//! - **application**: `ProductService`, the seam between handlers and storage
//! - **infrastructure**: SeaORM/SQLite and in-memory repository backends
//! - **interfaces**: axum router, handlers and Swagger documentation
//! - **server**: startup, seeding and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig, DEFAULT_PAGE_SIZE};

pub use application::ProductService;
pub use domain::{PagedResult, Product, Repository, RepositoryProvider};

pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};

pub use interfaces::create_api_router;

pub use server::{init_tracing, ServerHandle, ServerOptions};
