use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::ApiError;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u64 = MAX_PAGE_SIZE;

/// Largest offset the database drivers bind; they take signed 64-bit values.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Pagination query parameters extractor.
///
/// Clients address a page either by `limit`/`offset` or by `page`/`perPage`
/// (1-based). When `page` is present it wins over `offset`.
///
/// ```rust,ignore
/// async fn list(pagination: Pagination) -> impl IntoResponse {
///     let page = pagination.resolved();
///     // page.limit, page.offset
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Number of items to return (default: 100, max: 100)
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub limit: u64,

    /// Number of items to skip (default: 0)
    #[serde(default)]
    pub offset: u64,

    /// 1-based page number; overrides `offset`
    #[validate(range(min = 1, message = "must be 1 or greater"))]
    pub page: Option<u64>,

    /// Page size used together with `page`; overrides `limit`
    #[serde(rename = "perPage")]
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub per_page: Option<u64>,
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
            page: None,
            per_page: None,
        }
    }
}

impl Pagination {
    /// Collapse page-based addressing into a plain offset/limit pair.
    ///
    /// Offsets past [`MAX_OFFSET`] are clamped to it; such a page is empty.
    pub fn resolved(&self) -> Self {
        let limit = self.per_page.unwrap_or(self.limit).clamp(1, MAX_PAGE_SIZE);
        let offset = match self.page {
            Some(page) => page
                .saturating_sub(1)
                .checked_mul(limit)
                .map_or(MAX_OFFSET, |offset| offset.min(MAX_OFFSET)),
            None => self.offset.min(MAX_OFFSET),
        };
        Pagination {
            limit,
            offset,
            page: None,
            per_page: None,
        }
    }
}

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or("");
        let pagination: Pagination = serde_urlencoded::from_str(query)
            .map_err(|e| ApiError::BadRequest(format!("Invalid pagination parameters: {e}")))?;
        pagination.validate()?;
        Ok(pagination.resolved())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_full_page() {
        let p = Pagination::default().resolved();
        assert_eq!(p.limit, 100);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn page_overrides_offset() {
        let p = Pagination {
            limit: 20,
            offset: 7,
            page: Some(3),
            per_page: Some(10),
        }
        .resolved();
        assert_eq!(p.limit, 10);
        assert_eq!(p.offset, 20);
    }

    #[test]
    fn page_uses_limit_without_per_page() {
        let p = Pagination {
            limit: 25,
            offset: 0,
            page: Some(2),
            per_page: None,
        }
        .resolved();
        assert_eq!(p.limit, 25);
        assert_eq!(p.offset, 25);
    }

    #[test]
    fn huge_offsets_are_clamped() {
        let p = Pagination {
            offset: u64::MAX,
            ..Pagination::default()
        }
        .resolved();
        assert_eq!(p.offset, MAX_OFFSET);

        let p = Pagination {
            page: Some(u64::MAX),
            ..Pagination::default()
        }
        .resolved();
        assert_eq!(p.offset, MAX_OFFSET);

        let p = Pagination {
            page: Some(MAX_OFFSET / 100),
            ..Pagination::default()
        }
        .resolved();
        assert_eq!(p.offset, (MAX_OFFSET / 100 - 1) * 100);
    }

    #[test]
    fn rejects_out_of_range_limit() {
        let p = Pagination {
            limit: 101,
            ..Pagination::default()
        };
        assert!(p.validate().is_err());

        let p = Pagination {
            limit: 0,
            ..Pagination::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_page_zero() {
        let p = Pagination {
            page: Some(0),
            ..Pagination::default()
        };
        let err = ApiError::from(p.validate().unwrap_err());
        let fields = err.fields().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "page");
    }
}
