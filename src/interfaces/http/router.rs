//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::RepositoryProvider;
use crate::interfaces::http::modules::{
    health::{self, HealthState},
    metrics::{self, http_metrics_middleware, MetricsState},
    products::{self, ProductsState},
    request_id::request_id_middleware,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::index,
        products::list_products,
        products::list_all_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
    ),
    components(
        schemas(
            health::HealthResponse,
            health::ComponentHealth,
            products::ProductDto,
            products::CreateProductRequest,
            products::UpdateProductRequest,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Products", description = "Paginated product catalog"),
    ),
    info(
        title = "Pagination Flow Catalog API",
        version = "1.0.0",
        description = "Product listing with page-based pagination",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Everything the routes need, composed once at startup
#[derive(Clone)]
pub struct AppState {
    pub repos: Arc<dyn RepositoryProvider>,
    /// Set for the SQLite backend; the health check pings it
    pub db: Option<DatabaseConnection>,
    pub page_size: u64,
    /// `/metrics` is only mounted when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

/// Create the router with all routes
pub fn create_api_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let product_routes = products::routes(ProductsState {
        repos: state.repos,
        page_size: state.page_size,
    });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            db: state.db,
            started_at: Arc::new(Instant::now()),
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(product_routes);

    if let Some(handle) = state.metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
}
