use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::config::RESOURCE_NOT_FOUND;
use common::AppError;

/// Integer user id from the `{id}` path segment.
///
/// A segment that is not an integer does not address any resource, so it
/// is answered like an unknown route.
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<i32>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| UserId(id))
            .map_err(|rejection| {
                tracing::debug!(%rejection, "Unroutable user id");
                AppError::not_found(RESOURCE_NOT_FOUND)
            })
    }
}
