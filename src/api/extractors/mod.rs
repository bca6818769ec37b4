//! Request extractors that turn malformed input into `AppError` JSON responses.

mod user_id;
mod validated_json;
mod validated_query;

pub use user_id::UserId;
pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;
