use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Paging metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Pages are 1-based; a zero page or page size is clamped to 1.
    pub fn compute(page: u32, page_size: u32, total: u64) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total_pages = total.div_ceil(u64::from(page_size));
        let total_pages = u32::try_from(total_pages).unwrap_or(u32::MAX);

        Self {
            page,
            page_size,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.page_size as usize)
    }

    /// Slice `items` down to this page.
    pub fn window<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.page_size as usize)
            .collect()
    }
}

/// Response envelope shared by every JSON endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
            pagination: None,
        }
    }

    pub fn paged(data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(data)
        }
    }

    pub fn failure(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            code: Some(code.into()),
            pagination: None,
        }
    }
}

/// Failure envelope for a request whose path, query, or body could not be
/// extracted. Keeps the rejection's status code.
pub(crate) fn invalid_request(status: StatusCode, detail: String) -> Response {
    let body = ApiResponse::<()>::failure(detail, "invalid_request");
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pagination_flags_track_position() {
        let first = Pagination::compute(1, 10, 25);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next);
        assert!(!first.has_prev);

        let last = Pagination::compute(3, 10, 25);
        assert!(!last.has_next);
        assert!(last.has_prev);

        let empty = Pagination::compute(1, 10, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_prev);
    }

    #[test]
    fn window_returns_requested_page() {
        let page = Pagination::compute(2, 2, 5);
        assert_eq!(page.window(vec![1, 2, 3, 4, 5]), vec![3, 4]);

        let beyond = Pagination::compute(9, 2, 5);
        assert!(beyond.window(vec![1, 2, 3, 4, 5]).is_empty());
    }

    #[test]
    fn failure_envelope_omits_data_fields() {
        let body = serde_json::to_value(ApiResponse::<()>::failure("nope", "not_found"))
            .expect("serializes");
        assert_eq!(
            body,
            json!({ "success": false, "data": null, "error": "nope", "code": "not_found" })
        );
    }

    #[test]
    fn paged_envelope_uses_camel_case_pagination() {
        let body = serde_json::to_value(ApiResponse::paged(vec![1], Pagination::compute(1, 1, 2)))
            .expect("serializes");
        assert_eq!(body["pagination"]["pageSize"], json!(1));
        assert_eq!(body["pagination"]["totalPages"], json!(2));
        assert_eq!(body["pagination"]["hasNext"], json!(true));
        assert!(body.get("error").is_none());
    }
}
