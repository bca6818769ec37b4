//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use common::AppError;
use domain::FieldErrors;

/// Validated JSON extractor that automatically validates requests.
///
/// Body errors (bad JSON, wrong types, missing content type) are reported
/// under `details.body`; rule violations under their field names.
///
/// # Example
///
/// ```rust,ignore
/// async fn create_user(ValidatedJson(payload): ValidatedJson<CreateUserRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let mut details = FieldErrors::new();
                details.add("body", rejection.body_text());
                AppError::validation("Invalid request body", details)
            })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
