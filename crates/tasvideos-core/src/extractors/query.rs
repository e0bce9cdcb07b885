use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// Query-string extractor that deserializes and then validates `T`.
///
/// Parse failures become `400 BAD_REQUEST`; rule violations become
/// `400 VALIDATION_ERROR` with one entry per offending field.
///
/// ```rust,ignore
/// async fn search(ValidatedQuery(req): ValidatedQuery<SearchRequest>) -> impl IntoResponse {
///     // req passed every #[validate(...)] rule
/// }
/// ```
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or("");
        let value: T = serde_urlencoded::from_str(query)
            .map_err(|e| ApiError::BadRequest(format!("Invalid query string: {e}")))?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}
