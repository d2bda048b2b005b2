//! Generic SeaORM implementation of `Repository<T>`
//!
//! Any domain type that knows how to map itself onto a SeaORM entity (see
//! [`EntityMapping`]) gets paging, lookups and a unit of work for free.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use sea_orm::{
    DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, Iterable, PaginatorTrait,
    PrimaryKeyToColumn, PrimaryKeyTrait, QueryOrder, QuerySelect, Select, TransactionTrait,
};
use tracing::{debug, info, warn};

use crate::domain::{
    DomainError, DomainResult, Identifiable, PageWindow, PagedResult, PendingChange, Repository,
    SavedChanges,
};

type ModelOf<T> = <<T as EntityMapping>::Entity as EntityTrait>::Model;
type ActiveModelOf<T> = <<T as EntityMapping>::Entity as EntityTrait>::ActiveModel;
type PrimaryKeyValueOf<T> =
    <<<T as EntityMapping>::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Conversion between a domain type and the SeaORM entity that stores it.
pub trait EntityMapping: Identifiable + Clone + Send + Sync + 'static {
    type Entity: EntityTrait;

    /// Name used in logs and `NotFound` errors.
    const NAME: &'static str;

    fn from_model(model: ModelOf<Self>) -> Self;

    /// Active model for an insert; the primary key is left to the store.
    fn to_insert_model(&self) -> ActiveModelOf<Self>;

    /// Active model carrying the primary key and every column.
    fn to_update_model(&self) -> ActiveModelOf<Self>;
}

/// Repository over one SeaORM entity with its own unit of work.
///
/// The connection pool is shared; the staged changes are not. Build one
/// repository per request.
pub struct SeaOrmRepository<T: EntityMapping> {
    db: DatabaseConnection,
    pending: Mutex<Vec<PendingChange<T>>>,
}

impl<T: EntityMapping> SeaOrmRepository<T> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            pending: Mutex::new(Vec::new()),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Vec<PendingChange<T>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn stage(&self, change: PendingChange<T>) {
        debug!(
            "{} {} staged for id={}",
            T::NAME,
            change.kind(),
            change.entity().id()
        );
        self.pending().push(change);
    }

    /// `SELECT` ordered by primary key so page boundaries are reproducible.
    fn ordered() -> Select<T::Entity> {
        let mut query = T::Entity::find();
        for key in <T::Entity as EntityTrait>::PrimaryKey::iter() {
            query = query.order_by_asc(key.into_column());
        }
        query
    }
}

#[async_trait]
impl<T> Repository<T> for SeaOrmRepository<T>
where
    T: EntityMapping,
    ModelOf<T>: IntoActiveModel<ActiveModelOf<T>> + Send + Sync,
    ActiveModelOf<T>: Send,
    PrimaryKeyValueOf<T>: From<i32>,
{
    async fn get_all(&self) -> DomainResult<Vec<T>> {
        let models = Self::ordered().all(&self.db).await?;
        Ok(models.into_iter().map(T::from_model).collect())
    }

    async fn get_paged(&self, page_number: u64, page_size: u64) -> DomainResult<PagedResult<T>> {
        let window = PageWindow::new(page_number, page_size)?;

        let total_items = Self::ordered().count(&self.db).await?;

        let models = if window.is_addressable() {
            Self::ordered()
                .offset(window.offset)
                .limit(window.limit)
                .all(&self.db)
                .await?
        } else {
            Vec::new()
        };

        debug!(
            "{} page {} (size {}): {} of {} items",
            T::NAME,
            page_number,
            page_size,
            models.len(),
            total_items
        );

        let items = models.into_iter().map(T::from_model).collect();
        Ok(PagedResult::new(items, total_items, page_number, page_size))
    }

    async fn get_by_id(&self, id: i32) -> DomainResult<Option<T>> {
        let model = T::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(T::from_model))
    }

    fn add(&self, entity: T) {
        self.stage(PendingChange::Add(entity));
    }

    fn update(&self, entity: T) {
        self.stage(PendingChange::Update(entity));
    }

    fn delete(&self, entity: T) {
        self.stage(PendingChange::Delete(entity));
    }

    fn pending_changes(&self) -> usize {
        self.pending().len()
    }

    async fn save(&self) -> DomainResult<SavedChanges<T>> {
        let changes = std::mem::take(&mut *self.pending());
        if changes.is_empty() {
            return Ok(SavedChanges::none());
        }

        let txn = self.db.begin().await?;
        let mut saved = SavedChanges::none();

        for change in changes {
            let applied = match change {
                PendingChange::Add(entity) => T::Entity::insert(entity.to_insert_model())
                    .exec_with_returning(&txn)
                    .await
                    .map(|model| saved.inserted.push(T::from_model(model)))
                    .map_err(DomainError::from),
                PendingChange::Update(entity) => T::Entity::update(entity.to_update_model())
                    .exec(&txn)
                    .await
                    .map(|_| saved.updated += 1)
                    .map_err(|e| match e {
                        DbErr::RecordNotUpdated => DomainError::not_found(T::NAME, entity.id()),
                        other => other.into(),
                    }),
                PendingChange::Delete(entity) => {
                    match T::Entity::delete(entity.to_update_model()).exec(&txn).await {
                        Ok(result) if result.rows_affected == 0 => {
                            Err(DomainError::not_found(T::NAME, entity.id()))
                        }
                        Ok(_) => {
                            saved.deleted += 1;
                            Ok(())
                        }
                        Err(e) => Err(e.into()),
                    }
                }
            };

            if let Err(e) = applied {
                warn!("{} batch rolled back: {}", T::NAME, e);
                txn.rollback().await?;
                return Err(e);
            }
        }

        txn.commit().await?;
        info!(
            "{} changes saved: {} inserted, {} updated, {} deleted",
            T::NAME,
            saved.inserted.len(),
            saved.updated,
            saved.deleted
        );
        Ok(saved)
    }
}
