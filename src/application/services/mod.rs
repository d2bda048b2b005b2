//! Application services

mod product;

pub use product::ProductService;
