//! Authentication routes for login, register, and token refresh.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info, warn};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use iltizam_core::auth::{UserRole, hash_password, validate_password, verify_password};
use iltizam_db::entities::users;
use iltizam_db::repositories::{NewCompany, RegistrantAdmin, RegistrationRepository};
use iltizam_db::{TenantId, UserRepository};
use iltizam_shared::auth::{LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, UserInfo};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
}

fn credentials_error(error: &str, message: &str) -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": error, "message": message })),
    )
        .into_response()
}

/// POST /auth/login - Authenticate user and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<axum::response::Response> {
    let user_repo = UserRepository::new((*state.master).clone());

    let Some(user) = user_repo
        .find_by_username(&payload.username)
        .await?
        .into_option()
    else {
        info!(username = %payload.username, "Login attempt for non-existent user");
        return Ok(credentials_error(
            "invalid_credentials",
            "Invalid username or password",
        ));
    };

    // Check if user is active
    if !user.is_active {
        return Ok(credentials_error(
            "account_disabled",
            "This account has been disabled",
        ));
    }

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = user.id, "Failed login attempt - invalid password");
        return Ok(credentials_error(
            "invalid_credentials",
            "Invalid username or password",
        ));
    }

    let response = issue_tokens(&state, user)?;
    info!(user_id = response.user.id, "User logged in successfully");

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// POST /auth/register - Register a new company with its first administrator.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::validation("username is required"));
    }
    validate_password(&payload.password)?;
    let password_hash = hash_password(&payload.password)?;

    let company = NewCompany {
        name: payload.company_name,
        email: payload.email,
        phone: payload.phone,
        address: payload.address,
        tax_number: payload.tax_number,
        currency_code: payload.currency_code,
    };
    let admin = RegistrantAdmin {
        username: payload.username,
        password_hash,
        full_name: payload.full_name,
    };

    let (company, user) = RegistrationRepository::new((*state.master).clone())
        .register(company, admin)
        .await?;

    info!(
        company_id = company.id,
        user_id = user.id,
        "Company registered"
    );

    // Open the tenant store now so its file exists before the first request.
    match TenantId::try_from(company.id) {
        Ok(tenant) => {
            if let Err(e) = state.tenants.resolve(tenant).await {
                warn!(company_id = company.id, error = %e, "Failed to open tenant store");
            }
        }
        Err(e) => warn!(company_id = company.id, error = %e, "Unexpected company id"),
    }

    let response = issue_tokens(&state, user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/refresh - Exchange a refresh token for new tokens.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<axum::response::Response> {
    let claims = match state.jwt_service.validate_token(&payload.refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            info!(error = %e, "Refresh with invalid token");
            return Ok(credentials_error(
                "invalid_token",
                "Invalid or expired refresh token",
            ));
        }
    };

    let user = UserRepository::new((*state.master).clone())
        .find_by_id(claims.user_id())
        .await?
        .into_option()
        .filter(|user| user.is_active);

    let Some(user) = user else {
        return Ok(credentials_error(
            "invalid_token",
            "User no longer exists or is disabled",
        ));
    };

    let response = issue_tokens(&state, user)?;
    Ok((StatusCode::OK, Json(response)).into_response())
}

fn issue_tokens(state: &AppState, user: users::Model) -> ApiResult<LoginResponse> {
    let role = UserRole::from(user.role).as_str();

    let tokens = state
        .jwt_service
        .generate_access_token(user.id, user.company_id, role)
        .and_then(|access| {
            state
                .jwt_service
                .generate_refresh_token(user.id, user.company_id, role)
                .map(|refresh| (access, refresh))
        });
    let (access_token, refresh_token) = tokens.map_err(|e| {
        error!(error = %e, "Failed to generate tokens");
        ApiError::internal(e.to_string())
    })?;

    Ok(LoginResponse {
        user: UserInfo {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            company_id: user.company_id,
            role: role.to_string(),
        },
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    })
}
