//! Response envelopes shared by every HTTP module

pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DomainError, PagedResult};

pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

/// Standard API response wrapper
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Payload, `null` on failure
    pub data: Option<T>,
    /// Error description, omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every handler's `Result`
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Map a domain failure onto its HTTP status.
pub fn api_error(err: DomainError) -> ApiError {
    let status = match &err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    }
    (status, Json(ApiResponse::error(err.to_string())))
}

/// One page of items plus the metadata needed to navigate
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    /// Items across all pages
    pub total_items: u64,
    /// 1-based page number
    pub page_number: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T, D> From<PagedResult<D>> for PagedResponse<T>
where
    D: Into<T>,
{
    fn from(page: PagedResult<D>) -> Self {
        let total_pages = page.total_pages();
        let has_previous = page.has_previous();
        let has_next = page.has_next();
        let page = page.map(Into::into);
        Self {
            items: page.items,
            total_items: page.total_items,
            page_number: page.page_number,
            page_size: page.page_size,
            total_pages,
            has_previous,
            has_next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_omits_error_field() {
        let json = serde_json::to_value(ApiResponse::success(5)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 5}));
    }

    #[test]
    fn error_has_null_data() {
        let json = serde_json::to_value(ApiResponse::<u8>::error("boom")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "data": null, "error": "boom"})
        );
    }

    #[test]
    fn domain_errors_map_to_status_codes() {
        assert_eq!(
            api_error(DomainError::not_found("Product", 3)).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            api_error(DomainError::Validation("page".into())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            api_error(DomainError::Storage("disk".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn first_of_several_pages_only_has_next() {
        let response: PagedResponse<u8> = PagedResult::new(vec![1u8; 10], 25, 1, 10).into();
        assert!(!response.has_previous);
        assert!(response.has_next);
    }

    #[test]
    fn paged_response_carries_total_pages() {
        let page = PagedResult::new(vec![1u8, 2, 3, 4, 5], 25, 3, 10);
        let response: PagedResponse<u32> = page.into();
        assert_eq!(response.items, vec![1, 2, 3, 4, 5]);
        assert_eq!(response.total_items, 25);
        assert_eq!(response.page_number, 3);
        assert_eq!(response.page_size, 10);
        assert_eq!(response.total_pages, 3);
        assert!(response.has_previous);
        assert!(!response.has_next);
    }
}
