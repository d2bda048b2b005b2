//! Product aggregate
//!
//! Contains the Product entity and the inputs used to create or change it.

pub mod model;

pub use model::{NewProduct, Product, ProductChanges};
