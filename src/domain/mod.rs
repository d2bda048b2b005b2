pub mod pagination;
pub mod product;
pub mod repository;

pub use pagination::{PageWindow, PagedResult, MAX_WINDOW_VALUE};
pub use product::{NewProduct, Product, ProductChanges};
pub use repository::{
    Identifiable, PendingChange, Repository, RepositoryProvider, SavedChanges,
};

pub use crate::support::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
