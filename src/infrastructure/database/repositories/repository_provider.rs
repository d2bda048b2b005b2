//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use super::product_repository::SeaOrmProductRepository;
use crate::domain::{Product, Repository, RepositoryProvider};

/// Repository provider backed by SeaORM.
///
/// Holds one connection pool; each repository it hands out gets its own
/// unit of work over that pool.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let page = repos.products().get_paged(1, 10).await?;
/// ```
#[derive(Clone)]
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn products(&self) -> Box<dyn Repository<Product>> {
        Box::new(SeaOrmProductRepository::new(self.db.clone()))
    }
}
