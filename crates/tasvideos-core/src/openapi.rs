use utoipa::OpenApi;

use crate::error::{ErrorDetail, FieldError};
use crate::extractors::Pagination;

/// Base OpenAPI document. Module specs are merged into it by the `App`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TASVideos API",
        version = "1.0.0",
        description = "Read access to the TASVideos publication catalog."
    ),
    components(schemas(ErrorDetail, FieldError, Pagination))
)]
pub struct ApiDoc;

/// Merge every module fragment into the base document.
pub fn merge_openapi(
    base: utoipa::openapi::OpenApi,
    fragments: impl IntoIterator<Item = utoipa::openapi::OpenApi>,
) -> utoipa::openapi::OpenApi {
    let mut merged = base;
    for fragment in fragments {
        merged.merge(fragment);
    }
    merged
}
