//! Validated query-string extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use common::AppError;
use domain::FieldErrors;

const INVALID_QUERY: &str = "Invalid query parameters";

/// Like [`super::ValidatedJson`], for query parameters.
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                let mut details = FieldErrors::new();
                details.add("query", rejection.body_text());
                AppError::validation(INVALID_QUERY, details)
            })?;

        value
            .validate()
            .map_err(|errors| AppError::validation(INVALID_QUERY, FieldErrors::from(errors)))?;

        Ok(ValidatedQuery(value))
    }
}
