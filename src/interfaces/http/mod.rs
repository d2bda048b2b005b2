//! HTTP REST API
//!
//! - `common`: response envelopes and the validating JSON extractor
//! - `modules`: products, health, metrics and request-id middleware
//! - `router`: composition with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use common::{ApiResponse, PagedResponse};
pub use router::{create_api_router, ApiDoc, AppState};
