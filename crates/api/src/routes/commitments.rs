//! Commitment routes, scoped to the caller's tenant store.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use iltizam_core::commitment::{CommitmentSort, parse_due_date};
use iltizam_db::entities::{commitments, payments};
use iltizam_db::repositories::{
    CommitmentFilter, CommitmentRepository, CommitmentWithPayments, NewCommitment,
    UpdateCommitment,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::request::{company_param, parse_status, required};
use crate::tenant::{open_store, require_tenant, resolve_tenant};

/// Creates the commitment routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/commitments", get(list_commitments).post(create_commitment))
        .route("/commitments/search/{number}", get(search_commitment))
        .route(
            "/commitments/{id}",
            get(get_commitment)
                .put(update_commitment)
                .delete(delete_commitment),
        )
}

/// Query parameters for listing commitments.
#[derive(Debug, Default, Deserialize)]
pub struct ListCommitmentsQuery {
    /// Status filter.
    pub status: Option<String>,
    /// Sort field.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// Sort direction, `ASC` or `DESC`.
    pub order: Option<String>,
    /// Company, for system administrators.
    pub company_id: Option<String>,
}

/// Query parameter naming the company, for system administrators.
#[derive(Debug, Default, Deserialize)]
pub struct CompanyQuery {
    /// Company id.
    pub company_id: Option<String>,
}

/// Request body for creating a commitment.
#[derive(Debug, Deserialize)]
pub struct CreateCommitmentRequest {
    /// Due date, `YYYY-MM-DD`.
    pub due_date: Option<String>,
    /// Account the obligation is booked against.
    pub account: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Amount owed.
    pub amount: Option<Decimal>,
    /// Initial status.
    pub status: Option<String>,
    /// Company, for system administrators.
    pub company_id: Option<Value>,
}

/// Request body for updating a commitment.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCommitmentRequest {
    /// New due date, `YYYY-MM-DD`.
    pub due_date: Option<String>,
    /// New account.
    pub account: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New status.
    pub status: Option<String>,
    /// Company, for system administrators.
    pub company_id: Option<Value>,
}

/// Commitment with its payments and balance.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentDetailResponse {
    /// The commitment.
    #[serde(flatten)]
    pub commitment: commitments::Model,
    /// Payments, newest first.
    pub payments: Vec<payments::Model>,
    /// Sum of all payments.
    pub total_paid: Decimal,
    /// Amount minus payments; negative if overpaid.
    pub remaining_amount: Decimal,
}

impl From<CommitmentWithPayments> for CommitmentDetailResponse {
    fn from(found: CommitmentWithPayments) -> Self {
        Self {
            commitment: found.commitment,
            payments: found.payments.into_vec(),
            total_paid: found.balance.total_paid,
            remaining_amount: found.balance.remaining,
        }
    }
}

/// GET `/commitments` - List the tenant's commitments.
///
/// A system administrator that names no company gets an empty list.
async fn list_commitments(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListCommitmentsQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = CommitmentFilter {
        status: parse_status(query.status.as_deref())?,
    };
    let sort = CommitmentSort::from_params(query.sort_by.as_deref(), query.order.as_deref());

    let Some(tenant) = resolve_tenant(&auth, query.company_id.as_deref())? else {
        return Ok(Json(json!({ "commitments": [] })));
    };

    let store = open_store(&state.tenants, tenant).await?;
    let commitments = CommitmentRepository::new(store).list(filter, sort).await?;

    Ok(Json(json!({ "commitments": commitments })))
}

/// POST `/commitments` - Create a commitment with the next reference number.
async fn create_commitment(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CompanyQuery>,
    Json(payload): Json<CreateCommitmentRequest>,
) -> ApiResult<impl IntoResponse> {
    let requested = query
        .company_id
        .or_else(|| company_param(payload.company_id.as_ref()));
    let tenant = require_tenant(&auth, requested.as_deref())?;

    let due_date = required(payload.due_date, "due_date")?;
    let input = NewCommitment {
        due_date: parse_due_date(&due_date)?,
        account: required(payload.account, "account")?.trim().to_string(),
        description: payload.description.unwrap_or_default(),
        amount: required(payload.amount, "amount")?,
        status: parse_status(payload.status.as_deref())?,
    };

    let store = open_store(&state.tenants, tenant).await?;
    let commitment = CommitmentRepository::new(store).create(input).await?;

    Ok((StatusCode::CREATED, Json(commitment)))
}

/// GET `/commitments/search/{number}` - Find a commitment by reference number.
async fn search_commitment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(number): Path<String>,
    Query(query): Query<CompanyQuery>,
) -> ApiResult<impl IntoResponse> {
    let tenant = require_tenant(&auth, query.company_id.as_deref())?;
    let store = open_store(&state.tenants, tenant).await?;

    let found = CommitmentRepository::new(store)
        .search_by_number(&number)
        .await?;

    Ok(Json(CommitmentDetailResponse::from(found)))
}

/// GET `/commitments/{id}` - Get one commitment.
async fn get_commitment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Query(query): Query<CompanyQuery>,
) -> ApiResult<impl IntoResponse> {
    let tenant = require_tenant(&auth, query.company_id.as_deref())?;
    let store = open_store(&state.tenants, tenant).await?;

    let commitment = CommitmentRepository::new(store)
        .find_by_id(id)
        .await?
        .required(|| ApiError::not_found(format!("Commitment not found: {id}")))?;

    Ok(Json(commitment))
}

/// PUT `/commitments/{id}` - Partially update a commitment.
async fn update_commitment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Query(query): Query<CompanyQuery>,
    Json(payload): Json<UpdateCommitmentRequest>,
) -> ApiResult<impl IntoResponse> {
    let requested = query
        .company_id
        .or_else(|| company_param(payload.company_id.as_ref()));
    let tenant = require_tenant(&auth, requested.as_deref())?;

    let input = UpdateCommitment {
        due_date: payload
            .due_date
            .as_deref()
            .map(parse_due_date)
            .transpose()?,
        account: payload
            .account
            .map(|account| required(Some(account), "account").map(|a| a.trim().to_string()))
            .transpose()?,
        description: payload.description,
        amount: payload.amount,
        status: parse_status(payload.status.as_deref())?,
    };

    let store = open_store(&state.tenants, tenant).await?;
    let commitment = CommitmentRepository::new(store).update(id, input).await?;

    Ok(Json(commitment))
}

/// DELETE `/commitments/{id}` - Delete a commitment without payments.
async fn delete_commitment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Query(query): Query<CompanyQuery>,
) -> ApiResult<impl IntoResponse> {
    let tenant = require_tenant(&auth, query.company_id.as_deref())?;
    let store = open_store(&state.tenants, tenant).await?;

    CommitmentRepository::new(store).delete(id).await?;

    Ok(Json(json!({ "message": format!("Commitment {id} deleted") })))
}
