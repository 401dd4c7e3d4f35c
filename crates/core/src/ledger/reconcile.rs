//! Settlement rules for commitments and their payments.
//!
//! A commitment is settled once the sum of its payments reaches its amount
//! (`total_paid >= amount`). Payments larger than the remaining balance are
//! rejected before anything is written, so a recorded payment never pushes the
//! total past the amount. The remaining balance can still turn negative when a
//! commitment's amount is lowered after payments were made; that state is
//! reported as is and not corrected.

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::LedgerError;
use crate::commitment::CommitmentStatus;

/// Paid total and remaining balance of a commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balance {
    /// Sum of all payments.
    pub total_paid: Decimal,
    /// Commitment amount minus `total_paid`; negative when over-paid.
    pub remaining: Decimal,
}

impl Balance {
    /// Computes the balance of a commitment from its payment amounts.
    pub fn of<I>(amount: Decimal, payments: I) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        let total_paid = total_paid(payments);
        Self {
            total_paid,
            remaining: remaining(amount, total_paid),
        }
    }
}

/// Validates that an amount is strictly positive.
///
/// # Errors
///
/// Returns `LedgerError::NonPositiveAmount` for zero or negative amounts.
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }
    Ok(())
}

/// Sums payment amounts.
pub fn total_paid<I>(payments: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    payments.into_iter().sum()
}

/// Remaining balance; may be negative.
#[must_use]
pub fn remaining(amount: Decimal, total_paid: Decimal) -> Decimal {
    amount - total_paid
}

/// Checks that a new payment is positive and fits in the remaining balance.
///
/// # Errors
///
/// Returns `LedgerError::NonPositiveAmount` or `LedgerError::ExceedsRemaining`.
pub fn check_payment_fits(payment: Decimal, remaining: Decimal) -> Result<(), LedgerError> {
    validate_amount(payment)?;
    if payment > remaining {
        return Err(LedgerError::ExceedsRemaining {
            amount: payment,
            remaining,
        });
    }
    Ok(())
}

/// Returns true once payments cover the commitment amount.
#[must_use]
pub fn is_settled(total_paid: Decimal, amount: Decimal) -> bool {
    total_paid >= amount
}

/// Status of a commitment after its paid total changed.
///
/// Settled commitments become `Completed`; otherwise the current status is
/// kept.
#[must_use]
pub fn status_after_payment(
    current: CommitmentStatus,
    total_paid: Decimal,
    amount: Decimal,
) -> CommitmentStatus {
    if is_settled(total_paid, amount) {
        CommitmentStatus::Completed
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_of_partial_payments() {
        let balance = Balance::of(dec!(1000), [dec!(250.50), dec!(100)]);
        assert_eq!(balance.total_paid, dec!(350.50));
        assert_eq!(balance.remaining, dec!(649.50));
    }

    #[test]
    fn test_balance_without_payments() {
        let balance = Balance::of(dec!(75.25), Vec::<Decimal>::new());
        assert_eq!(balance.total_paid, Decimal::ZERO);
        assert_eq!(balance.remaining, dec!(75.25));
    }

    #[test]
    fn test_remaining_goes_negative_when_over_paid() {
        assert_eq!(remaining(dec!(500), dec!(600)), dec!(-100));
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-0.01))]
    #[case(dec!(-100))]
    fn test_non_positive_amount_rejected(#[case] amount: Decimal) {
        assert_eq!(validate_amount(amount), Err(LedgerError::NonPositiveAmount));
        assert_eq!(
            check_payment_fits(amount, dec!(1000)),
            Err(LedgerError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_payment_equal_to_remaining_fits() {
        assert!(check_payment_fits(dec!(400), dec!(400)).is_ok());
    }

    #[test]
    fn test_payment_above_remaining_rejected() {
        assert_eq!(
            check_payment_fits(dec!(400.01), dec!(400)),
            Err(LedgerError::ExceedsRemaining {
                amount: dec!(400.01),
                remaining: dec!(400),
            })
        );
    }

    #[test]
    fn test_no_payment_fits_a_settled_commitment() {
        assert!(check_payment_fits(dec!(0.01), Decimal::ZERO).is_err());
        assert!(check_payment_fits(dec!(0.01), dec!(-5)).is_err());
    }

    #[rstest]
    #[case(CommitmentStatus::Active, dec!(999.99), dec!(1000), CommitmentStatus::Active)]
    #[case(CommitmentStatus::Active, dec!(1000), dec!(1000), CommitmentStatus::Completed)]
    #[case(CommitmentStatus::Active, dec!(1200), dec!(1000), CommitmentStatus::Completed)]
    #[case(CommitmentStatus::Cancelled, dec!(10), dec!(1000), CommitmentStatus::Cancelled)]
    fn test_status_after_payment(
        #[case] current: CommitmentStatus,
        #[case] paid: Decimal,
        #[case] amount: Decimal,
        #[case] expected: CommitmentStatus,
    ) {
        assert_eq!(status_after_payment(current, paid, amount), expected);
    }
}
