//! Product REST API handlers
//!
//! Each request builds its own `ProductService`, and with it a fresh
//! repository and unit of work.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateProductRequest, ListProductsParams, ProductDto, UpdateProductRequest};
use crate::application::ProductService;
use crate::domain::{DomainError, RepositoryProvider};
use crate::interfaces::http::common::{api_error, ApiError, ApiResponse, PagedResponse, ValidatedJson};

/// State shared by the product routes
#[derive(Clone)]
pub struct ProductsState {
    pub repos: Arc<dyn RepositoryProvider>,
    /// Fixed page size of the listing routes
    pub page_size: u64,
}

impl ProductsState {
    fn service(&self) -> ProductService {
        ProductService::new(self.repos.products())
    }

    async fn page(&self, page: u64) -> Result<PagedResponse<ProductDto>, ApiError> {
        self.service()
            .get_paged_products(page, self.page_size)
            .await
            .map(PagedResponse::from)
            .map_err(api_error)
    }
}

#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(ListProductsParams),
    responses(
        (status = 200, description = "One page of products", body = ApiResponse<PagedResponse<ProductDto>>),
        (status = 400, description = "Invalid page number")
    )
)]
pub async fn index(
    state: State<ProductsState>,
    params: Query<ListProductsParams>,
) -> Result<Json<ApiResponse<PagedResponse<ProductDto>>>, ApiError> {
    list_products(state, params).await
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    params(ListProductsParams),
    responses(
        (status = 200, description = "One page of products", body = ApiResponse<PagedResponse<ProductDto>>),
        (status = 400, description = "Invalid page number")
    )
)]
pub async fn list_products(
    State(state): State<ProductsState>,
    Query(params): Query<ListProductsParams>,
) -> Result<Json<ApiResponse<PagedResponse<ProductDto>>>, ApiError> {
    let page = state.page(params.page).await?;
    Ok(Json(ApiResponse::success(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/all",
    tag = "Products",
    responses(
        (status = 200, description = "Every product, ordered by id", body = ApiResponse<Vec<ProductDto>>)
    )
)]
pub async fn list_all_products(
    State(state): State<ProductsState>,
) -> Result<Json<ApiResponse<Vec<ProductDto>>>, ApiError> {
    let products = state.service().get_all_products().await.map_err(api_error)?;
    let dtos: Vec<ProductDto> = products.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = ApiResponse<ProductDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_product(
    State(state): State<ProductsState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    match state.service().get_product(id).await {
        Ok(Some(product)) => Ok(Json(ApiResponse::success(product.into()))),
        Ok(None) => Err(api_error(DomainError::not_found("Product", id))),
        Err(e) => Err(api_error(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<ProductDto>),
        (status = 400, description = "Malformed JSON"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_product(
    State(state): State<ProductsState>,
    ValidatedJson(req): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductDto>>), ApiError> {
    let product = state
        .service()
        .create_product(req.into())
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(product.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<ProductDto>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_product(
    State(state): State<ProductsState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    let product = state
        .service()
        .update_product(id, req.into())
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(product.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_product(
    State(state): State<ProductsState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    state.service().delete_product(id).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(format!("Product {} deleted", id))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, Response};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::Service;

    use crate::domain::NewProduct;
    use crate::infrastructure::InMemoryRepositoryProvider;
    use crate::interfaces::http::modules::products::routes;

    async fn state_with(count: usize) -> ProductsState {
        let repos = InMemoryRepositoryProvider::new();
        let service = ProductService::new(repos.products());
        for n in 1..=count {
            service
                .create_product(NewProduct {
                    name: format!("Product {}", n),
                    description: None,
                    price: n as i64 * 100,
                    currency: "USD".into(),
                })
                .await
                .unwrap();
        }
        ProductsState {
            repos: Arc::new(repos),
            page_size: 10,
        }
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let mut svc = app.into_service();
        let resp: Response<Body> = svc.call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn third_page_of_25_has_five_items() {
        let app = routes(state_with(25).await);
        let (status, body) = call(app, get("/products?page=3")).await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["items"].as_array().unwrap().len(), 5);
        assert_eq!(data["total_items"], 25);
        assert_eq!(data["page_number"], 3);
        assert_eq!(data["page_size"], 10);
        assert_eq!(data["total_pages"], 3);
        assert_eq!(data["has_previous"], true);
        assert_eq!(data["has_next"], false);
        assert_eq!(data["items"][0]["id"], 21);
    }

    #[tokio::test]
    async fn missing_page_defaults_to_first() {
        let app = routes(state_with(12).await);
        let (status, body) = call(app, get("/api/v1/products")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["page_number"], 1);
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 10);
        assert_eq!(body["data"]["has_previous"], false);
        assert_eq!(body["data"]["has_next"], true);
    }

    #[tokio::test]
    async fn empty_catalog_gives_empty_page() {
        let app = routes(state_with(0).await);
        let (status, body) = call(app, get("/products?page=1")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["items"], json!([]));
        assert_eq!(body["data"]["total_items"], 0);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_not_an_error() {
        let app = routes(state_with(5).await);
        let (status, body) = call(app, get("/products?page=4")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["items"], json!([]));
        assert_eq!(body["data"]["total_items"], 5);
    }

    #[tokio::test]
    async fn page_zero_is_bad_request() {
        let app = routes(state_with(5).await);
        let (status, body) = call(app, get("/products?page=0")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn huge_page_number_is_past_the_end() {
        let state = state_with(4).await;
        let (status, body) = call(routes(state), get("/products?page=1000000000000000001")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["items"], json!([]));
        assert_eq!(body["data"]["total_items"], 4);
        assert_eq!(body["data"]["has_next"], false);
    }

    #[tokio::test]
    async fn negative_page_is_rejected_by_the_extractor() {
        let app = routes(state_with(5).await);
        let (status, _) = call(app, get("/products?page=-1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = routes(state_with(2).await);
        let (status, body) = call(app, get("/api/v1/products/99")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn all_lists_every_product() {
        let app = routes(state_with(13).await);
        let (status, body) = call(app, get("/api/v1/products/all")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 13);
    }

    #[tokio::test]
    async fn create_update_delete_round() {
        let state = state_with(0).await;

        let (status, body) = call(
            routes(state.clone()),
            with_json(
                "POST",
                "/api/v1/products",
                json!({"name": "Kettle", "price": 3999, "currency": "eur"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["data"]["currency"], "EUR");
        assert_eq!(body["data"]["formatted_price"], "39.99 EUR");

        let (status, body) = call(
            routes(state.clone()),
            with_json("PUT", "/api/v1/products/1", json!({"price": 2999})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["price"], 2999);
        assert_eq!(body["data"]["name"], "Kettle");

        let delete = Request::builder()
            .method("DELETE")
            .uri("/api/v1/products/1")
            .body(Body::empty())
            .unwrap();
        let (status, _) = call(routes(state.clone()), delete).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(routes(state), get("/api/v1/products/1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_create_is_unprocessable() {
        let app = routes(state_with(0).await);
        let (status, body) = call(
            app,
            with_json("POST", "/api/v1/products", json!({"name": "", "price": 10})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let app = routes(state_with(1).await);
        let (status, _) = call(
            app,
            with_json("PUT", "/api/v1/products/7", json!({"name": "Ghost"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
