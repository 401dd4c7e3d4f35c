//! Company routes on the master store.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use iltizam_db::TenantId;
use iltizam_db::repositories::{CompanyRepository, NewCompany, UpdateCompany};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::request::required;
use crate::tenant::resolve_tenant;

/// Creates the company routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies/me", get(my_company))
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/{id}",
            get(get_company).put(update_company).delete(delete_company),
        )
}

/// Request body for creating a company.
#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    /// Company name.
    pub name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Address.
    pub address: Option<String>,
    /// Tax number.
    pub tax_number: Option<String>,
    /// Currency code, `SAR` when absent.
    pub currency_code: Option<String>,
}

/// Request body for updating a company.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCompanyRequest {
    /// New name.
    pub name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New tax number.
    pub tax_number: Option<String>,
    /// New currency code.
    pub currency_code: Option<String>,
}

fn repository(state: &AppState) -> CompanyRepository {
    CompanyRepository::new((*state.master).clone())
}

/// GET `/companies/me` - The caller's company with its currency symbol.
async fn my_company(State(state): State<AppState>, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    let tenant = resolve_tenant(&auth, None)?
        .ok_or_else(|| ApiError::not_found("The system administrator has no company"))?;

    let company = repository(&state)
        .find(tenant.get())
        .await?
        .required(|| ApiError::not_found(format!("Company not found: {tenant}")))?;

    Ok(Json(company))
}

/// GET `/companies` - List companies.
async fn list_companies(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    auth.require_system_admin()?;
    let companies = repository(&state).list().await?;
    Ok(Json(json!({ "companies": companies })))
}

/// POST `/companies` - Create a company and open its tenant store.
async fn create_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCompanyRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_system_admin()?;

    let input = NewCompany {
        name: required(payload.name, "name")?,
        email: payload.email,
        phone: payload.phone,
        address: payload.address,
        tax_number: payload.tax_number,
        currency_code: payload.currency_code,
    };
    let company = repository(&state).create(input).await?;

    match TenantId::try_from(company.id) {
        Ok(tenant) => {
            if let Err(e) = state.tenants.resolve(tenant).await {
                warn!(company_id = company.id, error = %e, "Failed to open tenant store");
            }
        }
        Err(e) => warn!(company_id = company.id, error = %e, "Unexpected company id"),
    }

    Ok((StatusCode::CREATED, Json(company)))
}

/// GET `/companies/{id}` - Get one company.
async fn get_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    auth.require_system_admin()?;

    let company = repository(&state)
        .find(id)
        .await?
        .required(|| ApiError::not_found(format!("Company not found: {id}")))?;

    Ok(Json(company))
}

/// PUT `/companies/{id}` - Update a company.
async fn update_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCompanyRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_system_admin()?;

    let input = UpdateCompany {
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        address: payload.address,
        tax_number: payload.tax_number,
        currency_code: payload.currency_code,
    };
    let company = repository(&state).update(id, input).await?;

    Ok(Json(company))
}

/// DELETE `/companies/{id}` - Delete a company without users.
async fn delete_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    auth.require_system_admin()?;
    repository(&state).delete(id).await?;
    Ok(Json(json!({ "message": format!("Company {id} deleted") })))
}
