//! Product DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{NewProduct, Product, ProductChanges};

/// Product as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Price in minor units (cents)
    pub price: i64,
    pub currency: String,
    /// e.g. "12.50 USD"
    pub formatted_price: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        Self {
            formatted_price: p.format_price(),
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            currency: p.currency,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Query string of the listing routes
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsParams {
    /// 1-based page number. Default: 1
    #[serde(default = "default_page")]
    pub page: u64,
}

fn default_page() -> u64 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "product name is required"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Price in minor units (cents)
    #[validate(range(min = 0, message = "price must be non-negative"))]
    pub price: i64,
    /// ISO 4217 code. Default: "USD"
    #[validate(length(equal = 3, message = "currency must be a 3-letter code"))]
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            currency: req.currency.to_uppercase(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "product name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price must be non-negative"))]
    pub price: Option<i64>,
    #[validate(length(equal = 3, message = "currency must be a 3-letter code"))]
    pub currency: Option<String>,
}

impl From<UpdateProductRequest> for ProductChanges {
    fn from(req: UpdateProductRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            currency: req.currency.map(|c| c.to_uppercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dto_includes_formatted_price() {
        let now = Utc::now();
        let product = NewProduct {
            name: "Desk".into(),
            description: None,
            price: 12950,
            currency: "EUR".into(),
        }
        .into_product(now);

        let dto = ProductDto::from(product);
        assert_eq!(dto.formatted_price, "129.50 EUR");
        assert_eq!(dto.created_at, now);
    }

    #[test]
    fn create_request_defaults_currency() {
        let req: CreateProductRequest =
            serde_json::from_str(r#"{"name":"Desk","price":100}"#).unwrap();
        assert_eq!(req.currency, "USD");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn create_request_rejects_bad_fields() {
        let req: CreateProductRequest =
            serde_json::from_str(r#"{"name":"","price":-5,"currency":"DOLLAR"}"#).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("currency"));
    }

    #[test]
    fn update_request_only_checks_present_fields() {
        let req: UpdateProductRequest = serde_json::from_str(r#"{"price":300}"#).unwrap();
        assert!(req.validate().is_ok());

        let changes = ProductChanges::from(req);
        assert_eq!(changes.price, Some(300));
        assert!(changes.name.is_none());
    }

    #[test]
    fn list_params_default_to_first_page() {
        let params: ListProductsParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 1);
    }
}
