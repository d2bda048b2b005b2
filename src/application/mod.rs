pub mod services;

pub use services::ProductService;
