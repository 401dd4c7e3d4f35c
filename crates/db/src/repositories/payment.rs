//! Payment repository for tenant store operations.
//!
//! Recording a payment is the only write that changes a commitment's status
//! implicitly. The whole sequence runs in one transaction:
//!
//! 1. load the commitment and its paid total, reject payments above the
//!    remaining balance
//! 2. insert the payment
//! 3. re-read the commitment amount and sum every payment
//! 4. mark the commitment completed once the sum covers the amount
//!
//! Any failure rolls every step back.

use chrono::{NaiveDate, Utc};
use iltizam_core::commitment::CommitmentStatus;
use iltizam_core::ledger::{
    Balance, LedgerError, check_payment_fits, status_after_payment, validate_amount,
};
use iltizam_shared::AppError;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{commitments, money::Money, payments};
use crate::query::ManyOf;

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Commitment being paid does not exist.
    #[error("Commitment not found: {0}")]
    CommitmentNotFound(i64),

    /// Amount rule violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::CommitmentNotFound(_) => Self::NotFound(err.to_string()),
            PaymentError::Ledger(e) => e.into(),
            PaymentError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Commitment being paid.
    pub commitment_id: i64,
    /// Payment method, e.g. `cash` or `bank_transfer`.
    pub method: String,
    /// Amount paid; must be positive and fit the remaining balance.
    pub amount: Decimal,
    /// Date the payment was made.
    pub payment_date: NaiveDate,
    /// Optional notes.
    pub notes: Option<String>,
}

/// Outcome of a recorded payment.
#[derive(Debug, Clone)]
pub struct RecordedPayment {
    /// The inserted payment.
    pub payment: payments::Model,
    /// The commitment after reconciliation.
    pub commitment: commitments::Model,
    /// Balance including the new payment.
    pub balance: Balance,
}

/// Payment repository bound to one tenant store.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a repository over a tenant store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a payment and reconciles the commitment's status.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::CommitmentNotFound` if the commitment does not
    /// exist, or `PaymentError::Ledger` if the amount is not positive or
    /// exceeds the remaining balance. Nothing is written in either case.
    pub async fn record(&self, input: NewPayment) -> Result<RecordedPayment, PaymentError> {
        validate_amount(input.amount)?;
        let commitment_id = input.commitment_id;

        let txn = self.db.begin().await?;

        let commitment = commitments::Entity::find_by_id(commitment_id)
            .one(&txn)
            .await?
            .ok_or(PaymentError::CommitmentNotFound(commitment_id))?;
        let before = Balance::of(commitment.amount.get(), paid_amounts(&txn, commitment_id).await?);
        check_payment_fits(input.amount, before.remaining)?;

        let payment = payments::ActiveModel {
            commitment_id: Set(commitment_id),
            method: Set(input.method),
            amount: Set(input.amount.into()),
            payment_date: Set(input.payment_date),
            notes: Set(input.notes),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let commitment = commitments::Entity::find_by_id(commitment_id)
            .one(&txn)
            .await?
            .ok_or(PaymentError::CommitmentNotFound(commitment_id))?;
        let after = Balance::of(commitment.amount.get(), paid_amounts(&txn, commitment_id).await?);

        let current: CommitmentStatus = commitment.status.into();
        let status = status_after_payment(current, after.total_paid, commitment.amount.get());
        let commitment = if status == current {
            commitment
        } else {
            let mut active: commitments::ActiveModel = commitment.into();
            active.status = Set(status.into());
            active.updated_at = Set(Utc::now());
            active.update(&txn).await?
        };

        txn.commit().await?;

        info!(
            commitment_id,
            payment_id = payment.id,
            amount = %payment.amount,
            remaining = %after.remaining,
            status = %status,
            "Payment recorded"
        );

        Ok(RecordedPayment {
            payment,
            commitment,
            balance: after,
        })
    }

    /// Lists payments newest first, optionally for one commitment.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, commitment_id: Option<i64>) -> Result<ManyOf<payments::Model>, DbErr> {
        let mut query = payments::Entity::find();

        if let Some(commitment_id) = commitment_id {
            query = query.filter(payments::Column::CommitmentId.eq(commitment_id));
        }

        query
            .order_by_desc(payments::Column::PaymentDate)
            .order_by_desc(payments::Column::Id)
            .all(&self.db)
            .await
            .map(ManyOf::from)
    }
}

/// Amounts of every payment of one commitment.
pub(crate) async fn paid_amounts<C: ConnectionTrait>(
    db: &C,
    commitment_id: i64,
) -> Result<Vec<Decimal>, DbErr> {
    let amounts: Vec<Money> = payments::Entity::find()
        .select_only()
        .column(payments::Column::Amount)
        .filter(payments::Column::CommitmentId.eq(commitment_id))
        .into_tuple()
        .all(db)
        .await?;

    Ok(amounts.into_iter().map(Money::get).collect())
}
