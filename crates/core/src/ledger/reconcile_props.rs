//! Property-based tests for payment reconciliation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::reconcile::{Balance, check_payment_fits, is_settled, status_after_payment};
use crate::commitment::CommitmentStatus;

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // Generate amounts from 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Accepting only payments that fit keeps the paid total within the
    /// amount, and the commitment settles exactly when nothing remains.
    #[test]
    fn prop_accepted_payments_never_over_pay(
        amount in positive_amount(),
        attempts in prop::collection::vec(positive_amount(), 1..30),
    ) {
        let mut accepted = Vec::new();
        let mut status = CommitmentStatus::Active;

        for payment in attempts {
            let before = Balance::of(amount, accepted.iter().copied());
            if check_payment_fits(payment, before.remaining).is_ok() {
                accepted.push(payment);
                let after = Balance::of(amount, accepted.iter().copied());
                prop_assert_eq!(after.remaining, before.remaining - payment);
                status = status_after_payment(status, after.total_paid, amount);
            }
        }

        let balance = Balance::of(amount, accepted.iter().copied());
        prop_assert!(balance.remaining >= Decimal::ZERO);
        prop_assert_eq!(
            status == CommitmentStatus::Completed,
            balance.remaining == Decimal::ZERO
        );
    }

    /// Paying the full remaining balance always settles the commitment.
    #[test]
    fn prop_paying_remaining_settles(amount in positive_amount(), first in positive_amount()) {
        prop_assume!(first < amount);
        let before = Balance::of(amount, [first]);

        prop_assert!(check_payment_fits(before.remaining, before.remaining).is_ok());
        prop_assert!(is_settled(first + before.remaining, amount));
    }
}
