//! Payment reconciliation logic.
//!
//! This module implements the rules applied when a payment is recorded
//! against a commitment:
//! - Payment amount validation
//! - Paid total and remaining balance
//! - Settlement detection (active → completed)

pub mod error;
pub mod reconcile;

#[cfg(test)]
mod reconcile_props;

pub use error::LedgerError;
pub use reconcile::{
    Balance, check_payment_fits, is_settled, remaining, status_after_payment, total_paid,
    validate_amount,
};
