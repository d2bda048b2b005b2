//! In-memory storage implementation
//!
//! Same contract as the SeaORM repository, backed by an ordered map. Used by
//! the `memory` database backend and in tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::{
    DomainError, DomainResult, Identifiable, PageWindow, PagedResult, PendingChange, Product,
    Repository, RepositoryProvider, SavedChanges,
};

/// Rows of one entity type, shared by every repository handed out for it.
pub struct Table<T> {
    name: &'static str,
    rows: RwLock<BTreeMap<i32, T>>,
    next_id: AtomicI32,
}

impl<T> Table<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI32::new(1),
        }
    }
}

/// Repository over a shared [`Table`] with its own unit of work.
pub struct InMemoryRepository<T> {
    table: Arc<Table<T>>,
    pending: Mutex<Vec<PendingChange<T>>>,
}

impl<T> InMemoryRepository<T>
where
    T: Identifiable + Clone + Send + Sync + 'static,
{
    pub fn new(table: Arc<Table<T>>) -> Self {
        Self {
            table,
            pending: Mutex::new(Vec::new()),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Vec<PendingChange<T>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn not_found(&self, id: i32) -> DomainError {
        DomainError::NotFound {
            entity: self.table.name,
            field: "id",
            value: id.to_string(),
        }
    }
}

#[async_trait]
impl<T> Repository<T> for InMemoryRepository<T>
where
    T: Identifiable + Clone + Send + Sync + 'static,
{
    async fn get_all(&self) -> DomainResult<Vec<T>> {
        let rows = self.table.rows.read().await;
        Ok(rows.values().cloned().collect())
    }

    async fn get_paged(&self, page_number: u64, page_size: u64) -> DomainResult<PagedResult<T>> {
        let window = PageWindow::new(page_number, page_size)?;
        let rows = self.table.rows.read().await;

        let total_items = rows.len() as u64;
        let start = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
        let items: Vec<T> = rows.values().skip(start).take(limit).cloned().collect();

        debug!(
            "{} page {} (size {}): {} of {} items",
            self.table.name,
            page_number,
            page_size,
            items.len(),
            total_items
        );
        Ok(PagedResult::new(items, total_items, page_number, page_size))
    }

    async fn get_by_id(&self, id: i32) -> DomainResult<Option<T>> {
        Ok(self.table.rows.read().await.get(&id).cloned())
    }

    fn add(&self, entity: T) {
        self.pending().push(PendingChange::Add(entity));
    }

    fn update(&self, entity: T) {
        self.pending().push(PendingChange::Update(entity));
    }

    fn delete(&self, entity: T) {
        self.pending().push(PendingChange::Delete(entity));
    }

    fn pending_changes(&self) -> usize {
        self.pending().len()
    }

    async fn save(&self) -> DomainResult<SavedChanges<T>> {
        let changes = std::mem::take(&mut *self.pending());
        if changes.is_empty() {
            return Ok(SavedChanges::none());
        }

        let mut rows = self.table.rows.write().await;
        let mut staged = rows.clone();
        let mut saved = SavedChanges::none();

        for change in changes {
            match change {
                PendingChange::Add(mut entity) => {
                    let id = self.table.next_id.fetch_add(1, Ordering::SeqCst);
                    entity.set_id(id);
                    staged.insert(id, entity.clone());
                    saved.inserted.push(entity);
                }
                PendingChange::Update(entity) => match staged.get_mut(&entity.id()) {
                    Some(row) => {
                        *row = entity;
                        saved.updated += 1;
                    }
                    None => {
                        warn!("{} batch discarded: update of missing row", self.table.name);
                        return Err(self.not_found(entity.id()));
                    }
                },
                PendingChange::Delete(entity) => {
                    if staged.remove(&entity.id()).is_none() {
                        warn!("{} batch discarded: delete of missing row", self.table.name);
                        return Err(self.not_found(entity.id()));
                    }
                    saved.deleted += 1;
                }
            }
        }

        *rows = staged;
        info!(
            "{} changes saved: {} inserted, {} updated, {} deleted",
            self.table.name,
            saved.inserted.len(),
            saved.updated,
            saved.deleted
        );
        Ok(saved)
    }
}

/// In-memory RepositoryProvider for development and testing
#[derive(Clone)]
pub struct InMemoryRepositoryProvider {
    products: Arc<Table<Product>>,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self {
            products: Arc::new(Table::new("Product")),
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn products(&self) -> Box<dyn Repository<Product>> {
        Box::new(InMemoryRepository::new(Arc::clone(&self.products)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::NewProduct;

    fn product(n: usize) -> Product {
        NewProduct {
            name: format!("P{}", n),
            description: None,
            price: n as i64,
            currency: "USD".into(),
        }
        .into_product(Utc::now())
    }

    async fn seeded(count: usize) -> InMemoryRepositoryProvider {
        let provider = InMemoryRepositoryProvider::new();
        let repo = provider.products();
        for n in 1..=count {
            repo.add(product(n));
        }
        repo.save().await.unwrap();
        provider
    }

    #[tokio::test]
    async fn ids_are_assigned_in_insertion_order() {
        let provider = seeded(3).await;
        let ids: Vec<i32> = provider
            .products()
            .get_all()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn page_length_follows_the_window_formula() {
        let provider = seeded(25).await;
        let repo = provider.products();
        for page_size in 1..=12u64 {
            for page_number in 1..=30u64 {
                let page = repo.get_paged(page_number, page_size).await.unwrap();
                let skipped = (page_number - 1) * page_size;
                let expected = page_size.min(25u64.saturating_sub(skipped));
                assert_eq!(page.items.len() as u64, expected);
                assert_eq!(page.total_items, 25);
            }
        }
    }

    #[tokio::test]
    async fn repositories_share_rows_but_not_pending_changes() {
        let provider = seeded(1).await;
        let writer = provider.products();
        let reader = provider.products();

        writer.add(product(2));
        assert_eq!(reader.pending_changes(), 0);
        assert_eq!(reader.get_all().await.unwrap().len(), 1);

        writer.save().await.unwrap();
        assert_eq!(reader.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failing_batch_leaves_rows_untouched() {
        let provider = seeded(2).await;
        let repo = provider.products();
        let mut ghost = product(9);
        ghost.id = 77;

        repo.add(product(3));
        repo.update(ghost);
        assert!(matches!(
            repo.save().await,
            Err(DomainError::NotFound { entity: "Product", .. })
        ));
        assert_eq!(repo.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let provider = seeded(2).await;
        let repo = provider.products();
        let first = repo.get_by_id(1).await.unwrap().unwrap();

        repo.delete(first);
        assert_eq!(repo.save().await.unwrap().deleted, 1);
        assert_eq!(repo.get_by_id(1).await.unwrap(), None);
    }
}
