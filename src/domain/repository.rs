//! Generic repository interface
//!
//! Reads go straight to the store. Writes are staged in a unit of work and
//! only reach the store when [`Repository::save`] commits them together.

use async_trait::async_trait;

use super::pagination::PagedResult;
use super::product::Product;
use super::DomainResult;

/// Entities addressed by an integer primary key.
pub trait Identifiable {
    fn id(&self) -> i32;

    /// Record the id assigned by the store on insert.
    fn set_id(&mut self, id: i32);
}

/// A mutation staged in a repository's unit of work.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingChange<T> {
    Add(T),
    Update(T),
    Delete(T),
}

impl<T> PendingChange<T> {
    pub fn entity(&self) -> &T {
        match self {
            Self::Add(e) | Self::Update(e) | Self::Delete(e) => e,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }
}

/// What a successful [`Repository::save`] wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedChanges<T> {
    /// Added entities as stored, with their assigned ids.
    pub inserted: Vec<T>,
    pub updated: usize,
    pub deleted: usize,
}

impl<T> SavedChanges<T> {
    pub fn none() -> Self {
        Self {
            inserted: Vec::new(),
            updated: 0,
            deleted: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.inserted.len() + self.updated + self.deleted
    }
}

#[async_trait]
pub trait Repository<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Every entity, ascending by primary key.
    async fn get_all(&self) -> DomainResult<Vec<T>>;

    /// One page of entities, ascending by primary key.
    ///
    /// Pages past the end come back with no items and the real total.
    async fn get_paged(&self, page_number: u64, page_size: u64) -> DomainResult<PagedResult<T>>;

    /// `Ok(None)` when nothing has that id.
    async fn get_by_id(&self, id: i32) -> DomainResult<Option<T>>;

    fn add(&self, entity: T);
    fn update(&self, entity: T);
    fn delete(&self, entity: T);

    /// Number of staged, not yet saved, changes.
    fn pending_changes(&self) -> usize;

    /// Apply every staged change atomically.
    ///
    /// On error nothing from the batch is applied and the batch is dropped.
    async fn save(&self) -> DomainResult<SavedChanges<T>>;
}

/// Hands out repositories scoped to a single unit of work.
///
/// Stores are shared, staged changes are not: every call returns a
/// repository with an empty change set.
pub trait RepositoryProvider: Send + Sync {
    fn products(&self) -> Box<dyn Repository<Product>>;
}
