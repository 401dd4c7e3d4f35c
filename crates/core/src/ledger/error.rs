//! Ledger error types.

use iltizam_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by payment reconciliation rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Amount must be strictly positive.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// Payment would exceed the commitment's remaining balance.
    #[error("Payment amount {amount} exceeds remaining balance {remaining}")]
    ExceedsRemaining {
        /// Requested payment amount.
        amount: Decimal,
        /// Remaining balance before the payment.
        remaining: Decimal,
    },
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::ExceedsRemaining { .. } => "EXCEEDS_REMAINING",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::Validation(err.to_string())
    }
}
