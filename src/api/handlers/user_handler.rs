//! User handlers.

use axum::{extract::State, response::Json, routing::get, Router};
use serde::{Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

use common::{AppError, AppResult};
use domain::validation::{check_email, field_error, not_null, required, validate_name};
use domain::{
    DeleteMode, NewUser, User, UserPatch, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

use crate::api::extractors::{UserId, ValidatedJson, ValidatedQuery};
use crate::api::AppState;
use crate::types::{ApiResponse, Created, PaginationMeta, PaginationParams};

/// Query parameters for listing users
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Page number, starting at 1
    #[param(example = 1)]
    pub page: Option<i64>,
    /// Items per page (1-100)
    #[param(example = 20)]
    pub per_page: Option<i64>,
    /// Case-insensitive match on name or email
    pub search: Option<String>,
}

impl ListUsersQuery {
    pub fn pagination(&self) -> PaginationParams {
        let page = self
            .page
            .and_then(|p| u64::try_from(p).ok())
            .unwrap_or(DEFAULT_PAGE_NUMBER);
        let per_page = self
            .per_page
            .and_then(|p| u64::try_from(p).ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);
        PaginationParams::new(page, per_page)
    }
}

impl Validate for ListUsersQuery {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if matches!(self.page, Some(page) if page < 1) {
            errors.add(
                "page",
                field_error("range", "page must be greater than or equal to 1"),
            );
        }
        if matches!(self.per_page, Some(per_page) if per_page < 1 || per_page > MAX_PAGE_SIZE as i64)
        {
            errors.add(
                "per_page",
                field_error(
                    "range",
                    format!("per_page must be between 1 and {}", MAX_PAGE_SIZE),
                ),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Query parameters for deleting a user
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteUserQuery {
    /// `true` (default) keeps the row and marks it inactive; any other value removes it
    #[param(example = "true")]
    pub soft: Option<String>,
}

impl DeleteUserQuery {
    pub fn mode(&self) -> DeleteMode {
        let soft = self
            .soft
            .as_deref()
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(true);
        DeleteMode::from_soft_flag(soft)
    }
}

/// User creation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Letters, spaces and hyphens; 2-100 characters
    #[schema(example = "Ann Lee")]
    pub name: Option<String>,
    /// Stored trimmed and lowercased
    #[schema(example = "ann@example.com")]
    pub email: Option<String>,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match self.name.as_deref() {
            None => errors.add("name", required("name")),
            Some(name) => {
                if let Err(violation) = validate_name(name) {
                    errors.add("name", violation);
                }
            }
        }
        match self.email.as_deref() {
            None => errors.add("email", required("email")),
            Some(email) => {
                for violation in check_email(email) {
                    errors.add("email", violation);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        NewUser::new(
            request.name.unwrap_or_default(),
            request.email.unwrap_or_default(),
        )
    }
}

/// User update request. Absent keys are left untouched; `null` is rejected.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, example = "Jane Doe")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, example = "jane@example.com")]
    pub email: Option<Option<String>>,
}

/// Distinguishes a key sent as `null` (`Some(None)`) from an absent key (`None`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match &self.name {
            None => {}
            Some(None) => errors.add("name", not_null("name")),
            Some(Some(name)) => {
                if let Err(violation) = validate_name(name) {
                    errors.add("name", violation);
                }
            }
        }
        match &self.email {
            None => {}
            Some(None) => errors.add("email", not_null("email")),
            Some(Some(email)) => {
                for violation in check_email(email) {
                    errors.add("email", violation);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(request: UpdateUserRequest) -> Self {
        UserPatch {
            name: request.name.flatten(),
            email: request.email.flatten(),
        }
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// List active users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of users with pagination metadata", body = Vec<User>),
        (status = 400, description = "Invalid query parameters")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListUsersQuery>,
) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    let params = query.pagination();
    let (users, metadata): (Vec<User>, PaginationMeta) =
        state.user_service.list_users(params, query.search).await?;

    Ok(Json(ApiResponse::paginated(users, metadata)))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User record", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    UserId(id): UserId,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = User),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Created<User>> {
    let user = state.user_service.create_user(payload.into()).await?;
    Ok(Created(ApiResponse::with_message(
        user,
        "User created successfully",
    )))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = User),
        (status = 400, description = "Validation error or empty update"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    UserId(id): UserId,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let patch = UserPatch::from(payload);
    if patch.is_empty() {
        return Err(AppError::bad_request("No data to update"));
    }

    let user = state.user_service.update_user(id, patch).await?;
    Ok(Json(ApiResponse::with_message(
        user,
        "User updated successfully",
    )))
}

/// Delete a user (soft by default)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID"),
        DeleteUserQuery
    ),
    responses(
        (status = 200, description = "User deleted successfully"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    UserId(id): UserId,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<DeleteUserQuery>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.user_service.delete_user(id, query.mode()).await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_collects_every_violation() {
        let request = CreateUserRequest {
            name: Some("X1".to_string()),
            email: None,
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let absent: UpdateUserRequest = serde_json::from_str(r#"{"name": "Ann Lee"}"#).unwrap();
        assert!(absent.email.is_none());
        assert!(absent.validate().is_ok());

        let null: UpdateUserRequest = serde_json::from_str(r#"{"email": null}"#).unwrap();
        assert_eq!(null.email, Some(None));
        let errors = null.validate().unwrap_err();
        assert_eq!(
            errors.field_errors()["email"][0].message.as_deref(),
            Some("email may not be null")
        );
    }

    #[test]
    fn test_list_query_bounds() {
        let query = ListUsersQuery {
            page: Some(0),
            per_page: Some(101),
            search: None,
        };
        let errors = query.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("page"));
        assert!(errors.field_errors().contains_key("per_page"));

        let defaults = ListUsersQuery::default().pagination();
        assert_eq!(defaults, PaginationParams::new(1, 20));
    }

    #[test]
    fn test_delete_mode_from_query() {
        assert_eq!(DeleteUserQuery::default().mode(), DeleteMode::Soft);
        let hard = DeleteUserQuery {
            soft: Some("false".to_string()),
        };
        assert_eq!(hard.mode(), DeleteMode::Hard);
        let soft = DeleteUserQuery {
            soft: Some("TRUE".to_string()),
        };
        assert_eq!(soft.mode(), DeleteMode::Soft);
    }
}
