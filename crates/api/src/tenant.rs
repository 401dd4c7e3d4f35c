//! Tenant resolution for company-scoped requests.
//!
//! Company users always act on their own company. The system administrator
//! has no company and names one explicitly through `company_id`.

use iltizam_db::{TenantId, TenantRegistry};
use sea_orm::DatabaseConnection;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;

/// Resolves the tenant a request acts on.
///
/// Returns `Ok(None)` when a system administrator passed no company.
///
/// # Errors
///
/// Returns a forbidden error for a non-admin without a company and a
/// validation error for a malformed `company_id`.
pub fn resolve_tenant(auth: &AuthUser, requested: Option<&str>) -> ApiResult<Option<TenantId>> {
    if let Some(company_id) = auth.company_id() {
        return TenantId::try_from(company_id)
            .map(Some)
            .map_err(|e| ApiError::forbidden(e.to_string()));
    }

    if !auth.is_system_admin() {
        return Err(ApiError::forbidden("User is not assigned to a company"));
    }

    match requested.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<TenantId>()
            .map(Some)
            .map_err(|e| ApiError::validation(format!("Invalid company_id: {e}"))),
    }
}

/// Resolves the tenant a request acts on, requiring one.
///
/// # Errors
///
/// Same as [`resolve_tenant`], plus a validation error when a system
/// administrator passed no company.
pub fn require_tenant(auth: &AuthUser, requested: Option<&str>) -> ApiResult<TenantId> {
    resolve_tenant(auth, requested)?.ok_or_else(|| {
        ApiError::validation("company_id is required for system administrators")
    })
}

/// Opens the store of a resolved tenant.
///
/// # Errors
///
/// Returns a database error if the store cannot be opened.
pub async fn open_store(
    tenants: &TenantRegistry,
    tenant: TenantId,
) -> ApiResult<DatabaseConnection> {
    Ok(tenants.resolve(tenant).await?)
}
