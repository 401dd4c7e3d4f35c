//! User administration routes on the master store.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use iltizam_core::auth::{UserRole, hash_password, validate_password};
use iltizam_db::UserRepository;
use iltizam_db::repositories::{NewUser, UpdateUser};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::request::{double_option, required};

/// Creates the user routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// Query parameters for listing users.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    /// Only users of this company.
    pub company_id: Option<String>,
}

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Login name.
    pub username: Option<String>,
    /// Plain password.
    pub password: Option<String>,
    /// Display name.
    pub full_name: Option<String>,
    /// Company; absent for another system administrator.
    pub company_id: Option<i64>,
    /// `admin` or `user`; `user` when absent.
    pub role: Option<String>,
}

/// Request body for updating a user.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    /// New display name.
    pub full_name: Option<String>,
    /// New role.
    pub role: Option<String>,
    /// Enable or disable login.
    pub is_active: Option<bool>,
    /// New company; `null` detaches the user.
    #[serde(default, deserialize_with = "double_option")]
    pub company_id: Option<Option<i64>>,
    /// New plain password.
    pub password: Option<String>,
}

fn repository(state: &AppState) -> UserRepository {
    UserRepository::new((*state.master).clone())
}

fn parse_role(raw: Option<&str>) -> ApiResult<Option<UserRole>> {
    raw.map(|role| {
        role.parse::<UserRole>()
            .map_err(|e| ApiError::validation(e.to_string()))
    })
    .transpose()
}

fn hash_new_password(password: &str) -> ApiResult<String> {
    validate_password(password)?;
    Ok(hash_password(password)?)
}

/// GET `/users` - List users, optionally for one company.
async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<impl IntoResponse> {
    auth.require_system_admin()?;

    let company_id = query
        .company_id
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            raw.parse::<i64>()
                .map_err(|_| ApiError::validation(format!("Invalid company_id: '{raw}'")))
        })
        .transpose()?;

    let users = repository(&state).list(company_id).await?;
    Ok(Json(json!({ "users": users })))
}

/// POST `/users` - Create a user.
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_system_admin()?;

    let password = required(payload.password, "password")?;
    let input = NewUser {
        username: required(payload.username, "username")?,
        password_hash: hash_new_password(&password)?,
        full_name: payload.full_name,
        company_id: payload.company_id,
        role: parse_role(payload.role.as_deref())?.unwrap_or(UserRole::User),
    };
    let user = repository(&state).create(input).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET `/users/{id}` - Get one user.
async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    auth.require_system_admin()?;

    let user = repository(&state)
        .find_by_id(id)
        .await?
        .required(|| ApiError::not_found(format!("User not found: {id}")))?;

    Ok(Json(user))
}

/// PUT `/users/{id}` - Update a user.
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_system_admin()?;

    let input = UpdateUser {
        full_name: payload.full_name,
        role: parse_role(payload.role.as_deref())?,
        is_active: payload.is_active,
        company_id: payload.company_id,
        password_hash: payload
            .password
            .as_deref()
            .map(hash_new_password)
            .transpose()?,
    };
    let user = repository(&state).update(id, input).await?;

    Ok(Json(user))
}

/// DELETE `/users/{id}` - Delete a user other than the caller and the bootstrap admin.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    auth.require_system_admin()?;

    repository(&state)
        .delete(id, auth.user_id(), &state.bootstrap_admin)
        .await?;

    Ok(Json(json!({ "message": format!("User {id} deleted") })))
}
