//! Commitment repository for tenant store operations.
//!
//! A repository is bound to one tenant store; the caller resolves the store
//! through the tenant registry before constructing it.

use chrono::{NaiveDate, Utc};
use iltizam_core::commitment::{
    CommitmentSort, CommitmentStatus, SortField, SortOrder, month_prefix, next_commit_number,
};
use iltizam_core::ledger::{Balance, LedgerError, status_after_payment, validate_amount};
use iltizam_shared::AppError;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoSimpleExpr, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::info;

use crate::entities::{
    commitments, payments, sea_orm_active_enums::CommitmentStatus as StoredStatus,
};
use crate::query::{ManyOf, ZeroOrOne};
use crate::repositories::payment::{PaymentRepository, paid_amounts};

/// Error types for commitment operations.
#[derive(Debug, thiserror::Error)]
pub enum CommitmentError {
    /// Commitment not found by id.
    #[error("Commitment not found: {0}")]
    NotFound(i64),

    /// No commitment carries the reference number.
    #[error("No commitment with number '{0}'")]
    NumberNotFound(String),

    /// Payments reference the commitment.
    #[error("Cannot delete commitment {id}: it has {payments} payment(s)")]
    HasPayments {
        /// Commitment id.
        id: i64,
        /// Number of referencing payments.
        payments: u64,
    },

    /// A concurrent creation took the same reference number.
    #[error("Commitment number '{0}' is already taken, retry the request")]
    DuplicateNumber(String),

    /// Amount rule violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CommitmentError> for AppError {
    fn from(err: CommitmentError) -> Self {
        match err {
            CommitmentError::NotFound(_) | CommitmentError::NumberNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            CommitmentError::HasPayments { .. } | CommitmentError::DuplicateNumber(_) => {
                Self::Conflict(err.to_string())
            }
            CommitmentError::Ledger(e) => e.into(),
            CommitmentError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a commitment.
#[derive(Debug, Clone)]
pub struct NewCommitment {
    /// Due date; also selects the numbering month.
    pub due_date: NaiveDate,
    /// Account the obligation is booked against.
    pub account: String,
    /// Free-text description.
    pub description: String,
    /// Amount owed; must be positive.
    pub amount: Decimal,
    /// Initial status; `active` when absent.
    pub status: Option<CommitmentStatus>,
}

/// Partial update of a commitment. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateCommitment {
    /// New due date. The reference number is kept.
    pub due_date: Option<NaiveDate>,
    /// New account.
    pub account: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New amount; must be positive.
    pub amount: Option<Decimal>,
    /// New status.
    pub status: Option<CommitmentStatus>,
}

/// Filter for commitment listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitmentFilter {
    /// Only commitments with this status.
    pub status: Option<CommitmentStatus>,
}

/// Commitment with its payments and balance.
#[derive(Debug, Clone)]
pub struct CommitmentWithPayments {
    /// The commitment record.
    pub commitment: commitments::Model,
    /// Payments, newest first.
    pub payments: ManyOf<payments::Model>,
    /// Paid total and remaining balance.
    pub balance: Balance,
}

/// Commitment repository for CRUD operations on one tenant store.
#[derive(Debug, Clone)]
pub struct CommitmentRepository {
    db: DatabaseConnection,
}

impl CommitmentRepository {
    /// Creates a repository over a tenant store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes the next reference number for a due date's month.
    ///
    /// Longer numbers sort first so that `-1000` ranks above `-999`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn next_number(&self, due_date: NaiveDate) -> Result<String, DbErr> {
        let prefix = month_prefix(due_date);

        let previous_max: Option<String> = commitments::Entity::find()
            .select_only()
            .column(commitments::Column::CommitNumber)
            .filter(commitments::Column::CommitNumber.starts_with(prefix.as_str()))
            .order_by_desc(Expr::cust(NUMBER_LENGTH))
            .order_by_desc(commitments::Column::CommitNumber)
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(next_commit_number(due_date, previous_max.as_deref()))
    }

    /// Creates a commitment with the next reference number of its month.
    ///
    /// # Errors
    ///
    /// Returns `CommitmentError::Ledger` for a non-positive amount and
    /// `CommitmentError::DuplicateNumber` if a concurrent creation took the
    /// number first.
    pub async fn create(&self, input: NewCommitment) -> Result<commitments::Model, CommitmentError> {
        validate_amount(input.amount)?;

        let commit_number = self.next_number(input.due_date).await?;
        let now = Utc::now();

        let commitment = commitments::ActiveModel {
            commit_number: Set(commit_number.clone()),
            due_date: Set(input.due_date),
            account: Set(input.account),
            description: Set(input.description),
            amount: Set(input.amount.into()),
            status: Set(input.status.unwrap_or_default().into()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let commitment = commitment.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                CommitmentError::DuplicateNumber(commit_number.clone())
            } else {
                CommitmentError::Database(e)
            }
        })?;

        info!(
            commitment_id = commitment.id,
            commit_number = %commitment.commit_number,
            "Commitment created"
        );
        Ok(commitment)
    }

    /// Finds a commitment by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<ZeroOrOne<commitments::Model>, DbErr> {
        commitments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map(ZeroOrOne::from)
    }

    /// Applies a partial update. The reference number never changes.
    ///
    /// A new amount is checked against the payments already recorded in the
    /// same transaction; an active commitment they now cover becomes
    /// completed.
    ///
    /// # Errors
    ///
    /// Returns `CommitmentError::NotFound` if the commitment does not exist.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateCommitment,
    ) -> Result<commitments::Model, CommitmentError> {
        if let Some(amount) = input.amount {
            validate_amount(amount)?;
        }

        let txn = self.db.begin().await?;

        let existing = commitments::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(CommitmentError::NotFound(id))?;
        let mut status: CommitmentStatus = input
            .status
            .unwrap_or_else(|| existing.status.into());

        let mut active: commitments::ActiveModel = existing.into();
        if let Some(due_date) = input.due_date {
            active.due_date = Set(due_date);
        }
        if let Some(account) = input.account {
            active.account = Set(account);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(amount) = input.amount {
            if status == CommitmentStatus::Active {
                let balance = Balance::of(amount, paid_amounts(&txn, id).await?);
                status = status_after_payment(status, balance.total_paid, amount);
            }
            active.amount = Set(amount.into());
        }
        if input.status.is_some() || input.amount.is_some() {
            active.status = Set(status.into());
        }
        active.updated_at = Set(Utc::now());

        let commitment = active.update(&txn).await?;
        txn.commit().await?;

        info!(
            commitment_id = id,
            status = %status,
            "Commitment updated"
        );
        Ok(commitment)
    }

    /// Deletes a commitment that has no payments.
    ///
    /// The payment check and the delete run in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `CommitmentError::NotFound` if absent and
    /// `CommitmentError::HasPayments` if any payment references it.
    pub async fn delete(&self, id: i64) -> Result<(), CommitmentError> {
        let txn = self.db.begin().await?;

        if commitments::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(CommitmentError::NotFound(id));
        }

        let payments = payments::Entity::find()
            .filter(payments::Column::CommitmentId.eq(id))
            .count(&txn)
            .await?;
        if payments > 0 {
            return Err(CommitmentError::HasPayments { id, payments });
        }

        commitments::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(commitment_id = id, "Commitment deleted");
        Ok(())
    }

    /// Lists commitments matching `filter`, ordered by `sort`.
    ///
    /// Rows with equal sort keys are ordered by id in the same direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: CommitmentFilter,
        sort: CommitmentSort,
    ) -> Result<ManyOf<commitments::Model>, DbErr> {
        let mut query = commitments::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(commitments::Column::Status.eq(StoredStatus::from(status)));
        }

        let order = match sort.order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };

        query
            .order_by(sort_key(sort.field), order.clone())
            .order_by(commitments::Column::Id, order)
            .all(&self.db)
            .await
            .map(ManyOf::from)
    }

    /// Finds a commitment by reference number, with its payments and balance.
    ///
    /// # Errors
    ///
    /// Returns `CommitmentError::NumberNotFound` if no commitment carries the
    /// number.
    pub async fn search_by_number(
        &self,
        number: &str,
    ) -> Result<CommitmentWithPayments, CommitmentError> {
        let commitment = ZeroOrOne::from(
            commitments::Entity::find()
                .filter(commitments::Column::CommitNumber.eq(number.trim()))
                .one(&self.db)
                .await?,
        )
        .required(|| CommitmentError::NumberNotFound(number.to_string()))?;

        let payments = PaymentRepository::new(self.db.clone())
            .list(Some(commitment.id))
            .await?;
        let balance = Balance::of(
            commitment.amount.get(),
            payments.iter().map(|p| p.amount.get()),
        );

        Ok(CommitmentWithPayments {
            commitment,
            payments,
            balance,
        })
    }
}

/// Length of the stored reference number, used to rank `-1000` above `-999`.
const NUMBER_LENGTH: &str = "LENGTH(\"commit_number\")";

/// Amounts are stored as text; ordering compares their numeric value.
const AMOUNT_VALUE: &str = "CAST(\"amount\" AS REAL)";

fn sort_key(field: SortField) -> SimpleExpr {
    match field {
        SortField::DueDate => commitments::Column::DueDate.into_simple_expr(),
        SortField::CreatedAt => commitments::Column::CreatedAt.into_simple_expr(),
        SortField::Amount => Expr::cust(AMOUNT_VALUE),
        SortField::Description => commitments::Column::Description.into_simple_expr(),
        SortField::Status => commitments::Column::Status.into_simple_expr(),
    }
}
