//! Storage backends that do not need a database

pub mod memory;

pub use memory::{InMemoryRepository, InMemoryRepositoryProvider, Table};
