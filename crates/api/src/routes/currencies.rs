//! Currency routes on the master store.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use iltizam_db::repositories::{CurrencyRepository, NewCurrency, UpdateCurrency};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::request::required;

/// Creates the currency routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/currencies", get(list_currencies).post(create_currency))
        .route(
            "/currencies/{code}",
            get(get_currency)
                .put(update_currency)
                .delete(delete_currency),
        )
}

/// Request body for creating a currency.
#[derive(Debug, Deserialize)]
pub struct CreateCurrencyRequest {
    /// Three-letter code.
    pub code: Option<String>,
    /// English name.
    pub name_en: Option<String>,
    /// Arabic name.
    pub name_ar: Option<String>,
    /// Symbol.
    pub symbol: Option<String>,
}

/// Request body for updating a currency.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCurrencyRequest {
    /// New English name.
    pub name_en: Option<String>,
    /// New Arabic name.
    pub name_ar: Option<String>,
    /// New symbol.
    pub symbol: Option<String>,
}

fn repository(state: &AppState) -> CurrencyRepository {
    CurrencyRepository::new((*state.master).clone())
}

/// GET `/currencies` - List all currencies.
async fn list_currencies(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let currencies = repository(&state).list().await?;
    Ok(Json(json!({ "currencies": currencies })))
}

/// GET `/currencies/{code}` - Get one currency.
async fn get_currency(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(code): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let currency = repository(&state)
        .find(&code)
        .await?
        .required(|| ApiError::not_found(format!("Currency not found: {code}")))?;

    Ok(Json(currency))
}

/// POST `/currencies` - Add a currency.
async fn create_currency(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCurrencyRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_system_admin()?;

    let input = NewCurrency {
        code: required(payload.code, "code")?,
        name_en: required(payload.name_en, "name_en")?,
        name_ar: payload.name_ar.unwrap_or_default(),
        symbol: required(payload.symbol, "symbol")?,
    };
    let currency = repository(&state).create(input).await?;

    Ok((StatusCode::CREATED, Json(currency)))
}

/// PUT `/currencies/{code}` - Update a currency's names or symbol.
async fn update_currency(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(code): Path<String>,
    Json(payload): Json<UpdateCurrencyRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_system_admin()?;

    let input = UpdateCurrency {
        name_en: payload.name_en,
        name_ar: payload.name_ar,
        symbol: payload.symbol,
    };
    let currency = repository(&state).update(&code, input).await?;

    Ok(Json(currency))
}

/// DELETE `/currencies/{code}` - Delete a currency no company uses.
async fn delete_currency(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(code): Path<String>,
) -> ApiResult<impl IntoResponse> {
    auth.require_system_admin()?;
    repository(&state).delete(&code).await?;
    Ok(Json(json!({ "message": format!("Currency {code} deleted") })))
}
