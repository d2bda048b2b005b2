//! Product service
//!
//! Keeps the presentation layer away from the generic repository. Listing
//! calls pass straight through; writes stage a change and save it.

use chrono::Utc;
use tracing::info;

use crate::domain::{
    DomainError, DomainResult, NewProduct, PagedResult, Product, ProductChanges, Repository,
};

/// Service for product catalog operations
///
/// Owns one repository, and with it one unit of work, so build a service per
/// request.
pub struct ProductService {
    repository: Box<dyn Repository<Product>>,
}

impl ProductService {
    pub fn new(repository: Box<dyn Repository<Product>>) -> Self {
        Self { repository }
    }

    pub async fn get_paged_products(
        &self,
        page: u64,
        page_size: u64,
    ) -> DomainResult<PagedResult<Product>> {
        self.repository.get_paged(page, page_size).await
    }

    pub async fn get_all_products(&self) -> DomainResult<Vec<Product>> {
        self.repository.get_all().await
    }

    pub async fn get_product(&self, id: i32) -> DomainResult<Option<Product>> {
        self.repository.get_by_id(id).await
    }

    /// Insert a product and return it as stored.
    pub async fn create_product(&self, input: NewProduct) -> DomainResult<Product> {
        self.repository.add(input.into_product(Utc::now()));

        let created = self
            .repository
            .save()
            .await?
            .inserted
            .pop()
            .ok_or_else(|| DomainError::Storage("insert returned no row".into()))?;

        info!("Product created: {} ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn update_product(&self, id: i32, changes: ProductChanges) -> DomainResult<Product> {
        let mut product = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Product", id))?;

        changes.apply_to(&mut product, Utc::now());
        self.repository.update(product.clone());
        self.repository.save().await?;

        info!("Product updated: {}", id);
        Ok(product)
    }

    pub async fn delete_product(&self, id: i32) -> DomainResult<()> {
        let product = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Product", id))?;

        self.repository.delete(product);
        self.repository.save().await?;

        info!("Product deleted: {}", id);
        Ok(())
    }
}
