//! Database repository implementations
//!
//! One generic SeaORM repository plus per-entity mappings.

pub mod product_repository;
pub mod repository_provider;
pub mod sea_orm_repository;

pub use product_repository::SeaOrmProductRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use sea_orm_repository::{EntityMapping, SeaOrmRepository};
