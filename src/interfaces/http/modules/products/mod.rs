//! Product catalog routes

pub mod dto;
pub mod handlers;

use axum::routing::get;
use axum::Router;

pub use dto::*;
pub use handlers::*;

/// `/products` plus the `/api/v1/products` resource.
pub fn routes(state: ProductsState) -> Router {
    Router::new()
        .route("/products", get(handlers::index))
        .route(
            "/api/v1/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/api/v1/products/all", get(handlers::list_all_products))
        .route(
            "/api/v1/products/{id}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .with_state(state)
}
