//! Payment routes, scoped to the caller's tenant store.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use iltizam_db::entities::{commitments, payments};
use iltizam_db::repositories::{NewPayment, PaymentRepository, RecordedPayment};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::request::{company_param, parse_date, required};
use crate::tenant::{open_store, require_tenant};

/// Creates the payment routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/payments", get(list_payments).post(create_payment))
}

/// Query parameters for listing payments.
#[derive(Debug, Default, Deserialize)]
pub struct ListPaymentsQuery {
    /// Only payments of this commitment.
    pub commitment_id: Option<String>,
    /// Company, for system administrators.
    pub company_id: Option<String>,
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Commitment being paid.
    pub commitment_id: Option<i64>,
    /// Amount paid.
    pub amount: Option<Decimal>,
    /// Payment method.
    pub method: Option<String>,
    /// Payment date, `YYYY-MM-DD`.
    pub payment_date: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// Company, for system administrators.
    pub company_id: Option<Value>,
}

/// A recorded payment with the reconciled commitment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    /// The new payment.
    pub payment: payments::Model,
    /// The commitment after the payment.
    pub commitment: commitments::Model,
    /// Sum of all payments.
    pub total_paid: Decimal,
    /// Amount still owed.
    pub remaining_amount: Decimal,
}

impl From<RecordedPayment> for PaymentResponse {
    fn from(recorded: RecordedPayment) -> Self {
        Self {
            payment: recorded.payment,
            commitment: recorded.commitment,
            total_paid: recorded.balance.total_paid,
            remaining_amount: recorded.balance.remaining,
        }
    }
}

/// GET `/payments` - List payments newest first.
async fn list_payments(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListPaymentsQuery>,
) -> ApiResult<impl IntoResponse> {
    let tenant = require_tenant(&auth, query.company_id.as_deref())?;

    let commitment_id = query
        .commitment_id
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            raw.parse::<i64>()
                .map_err(|_| ApiError::validation(format!("Invalid commitment_id: '{raw}'")))
        })
        .transpose()?;

    let store = open_store(&state.tenants, tenant).await?;
    let payments = PaymentRepository::new(store).list(commitment_id).await?;

    Ok(Json(json!({ "payments": payments })))
}

/// POST `/payments` - Record a payment against a commitment.
async fn create_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListPaymentsQuery>,
    Json(payload): Json<CreatePaymentRequest>,
) -> ApiResult<impl IntoResponse> {
    let requested = query
        .company_id
        .or_else(|| company_param(payload.company_id.as_ref()));
    let tenant = require_tenant(&auth, requested.as_deref())?;

    let payment_date = required(payload.payment_date, "payment_date")?;
    let input = NewPayment {
        commitment_id: required(payload.commitment_id, "commitment_id")?,
        method: required(payload.method, "method")?.trim().to_string(),
        amount: required(payload.amount, "amount")?,
        payment_date: parse_date(&payment_date, "payment_date")?,
        notes: payload.notes,
    };

    let store = open_store(&state.tenants, tenant).await?;
    let recorded = PaymentRepository::new(store).record(input).await?;

    Ok((StatusCode::CREATED, Json(PaymentResponse::from(recorded))))
}
