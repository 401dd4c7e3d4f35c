//! Integration tests for payment recording and reconciliation.

mod common;

use common::{TenantFixture, date, new_commitment};
use iltizam_core::commitment::CommitmentStatus;
use iltizam_core::ledger::LedgerError;
use iltizam_db::entities::sea_orm_active_enums::CommitmentStatus as StoredStatus;
use iltizam_db::repositories::{NewPayment, PaymentError, UpdateCommitment};
use iltizam_db::{CommitmentRepository, PaymentRepository};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct Ledger {
    _fixture: TenantFixture,
    commitments: CommitmentRepository,
    payments: PaymentRepository,
}

async fn ledger() -> Ledger {
    let fixture = TenantFixture::new();
    let store = fixture.store(1).await;
    Ledger {
        commitments: CommitmentRepository::new(store.clone()),
        payments: PaymentRepository::new(store),
        _fixture: fixture,
    }
}

fn payment(commitment_id: i64, amount: Decimal, day: &str) -> NewPayment {
    NewPayment {
        commitment_id,
        method: "bank_transfer".to_string(),
        amount,
        payment_date: date(day),
        notes: Some("instalment".to_string()),
    }
}

#[tokio::test]
async fn test_paying_exact_remaining_completes() {
    let ledger = ledger().await;
    let commitment = ledger
        .commitments
        .create(new_commitment("2025-03-15", dec!(1000)))
        .await
        .expect("Failed to create");

    let first = ledger
        .payments
        .record(payment(commitment.id, dec!(400), "2025-03-16"))
        .await
        .expect("Failed to pay");
    assert_eq!(first.commitment.status, StoredStatus::Active);
    assert_eq!(first.balance.remaining, dec!(600));

    let second = ledger
        .payments
        .record(payment(commitment.id, dec!(600), "2025-03-17"))
        .await
        .expect("Failed to pay");
    assert_eq!(second.commitment.status, StoredStatus::Completed);
    assert_eq!(second.balance.total_paid, dec!(1000));
    assert_eq!(second.balance.remaining, Decimal::ZERO);

    let stored = ledger
        .commitments
        .find_by_id(commitment.id)
        .await
        .expect("query")
        .into_option()
        .expect("commitment exists");
    assert_eq!(stored.status, StoredStatus::Completed);
}

#[tokio::test]
async fn test_partial_payment_lowers_remaining_exactly() {
    let ledger = ledger().await;
    let commitment = ledger
        .commitments
        .create(new_commitment("2025-03-15", dec!(1000)))
        .await
        .expect("Failed to create");

    let recorded = ledger
        .payments
        .record(payment(commitment.id, dec!(250.50), "2025-03-16"))
        .await
        .expect("Failed to pay");

    assert_eq!(recorded.commitment.status, StoredStatus::Active);
    assert_eq!(recorded.balance.remaining, dec!(749.50));
    assert_eq!(recorded.payment.amount, dec!(250.50));
}

#[tokio::test]
async fn test_over_payment_is_rejected_without_writes() {
    let ledger = ledger().await;
    let commitment = ledger
        .commitments
        .create(new_commitment("2025-03-15", dec!(500)))
        .await
        .expect("Failed to create");
    ledger
        .payments
        .record(payment(commitment.id, dec!(100), "2025-03-16"))
        .await
        .expect("Failed to pay");

    let result = ledger
        .payments
        .record(payment(commitment.id, dec!(400.25), "2025-03-17"))
        .await;

    assert!(matches!(
        result,
        Err(PaymentError::Ledger(LedgerError::ExceedsRemaining { .. }))
    ));
    let rows = ledger.payments.list(Some(commitment.id)).await.expect("list");
    assert_eq!(rows.len(), 1);
    let stored = ledger
        .commitments
        .find_by_id(commitment.id)
        .await
        .expect("query")
        .into_option()
        .expect("commitment exists");
    assert_eq!(stored.status, StoredStatus::Active);
}

#[tokio::test]
async fn test_completed_commitment_accepts_no_payment() {
    let ledger = ledger().await;
    let commitment = ledger
        .commitments
        .create(new_commitment("2025-03-15", dec!(80)))
        .await
        .expect("Failed to create");
    ledger
        .payments
        .record(payment(commitment.id, dec!(80), "2025-03-16"))
        .await
        .expect("Failed to pay");

    let result = ledger
        .payments
        .record(payment(commitment.id, dec!(0.50), "2025-03-17"))
        .await;

    assert!(matches!(result, Err(PaymentError::Ledger(_))));
}

#[tokio::test]
async fn test_payment_for_unknown_commitment() {
    let ledger = ledger().await;

    let result = ledger.payments.record(payment(77, dec!(10), "2025-03-16")).await;

    assert!(matches!(result, Err(PaymentError::CommitmentNotFound(77))));
    assert!(ledger.payments.list(None).await.expect("list").is_empty());
}

#[tokio::test]
async fn test_non_positive_payment_rejected() {
    let ledger = ledger().await;
    let commitment = ledger
        .commitments
        .create(new_commitment("2025-03-15", dec!(100)))
        .await
        .expect("Failed to create");

    let result = ledger
        .payments
        .record(payment(commitment.id, dec!(0), "2025-03-16"))
        .await;

    assert!(matches!(
        result,
        Err(PaymentError::Ledger(LedgerError::NonPositiveAmount))
    ));
}

#[tokio::test]
async fn test_search_lists_payments_newest_first() {
    let ledger = ledger().await;
    let commitment = ledger
        .commitments
        .create(new_commitment("2025-03-15", dec!(1000)))
        .await
        .expect("Failed to create");
    for (amount, day) in [
        (dec!(100), "2025-03-20"),
        (dec!(150), "2025-04-02"),
        (dec!(50), "2025-03-25"),
    ] {
        ledger
            .payments
            .record(payment(commitment.id, amount, day))
            .await
            .expect("Failed to pay");
    }

    let found = ledger
        .commitments
        .search_by_number(&commitment.commit_number)
        .await
        .expect("Failed to search");

    let days: Vec<_> = found.payments.iter().map(|p| p.payment_date).collect();
    assert_eq!(
        days,
        [date("2025-04-02"), date("2025-03-25"), date("2025-03-20")]
    );
    assert_eq!(found.balance.total_paid, dec!(300));
    assert_eq!(found.balance.remaining, dec!(700));
}

#[tokio::test]
async fn test_lowering_amount_below_payments_completes_commitment() {
    let ledger = ledger().await;
    let commitment = ledger
        .commitments
        .create(new_commitment("2025-03-15", dec!(1000)))
        .await
        .expect("Failed to create");
    ledger
        .payments
        .record(payment(commitment.id, dec!(600), "2025-03-16"))
        .await
        .expect("Failed to pay");

    let updated = ledger
        .commitments
        .update(
            commitment.id,
            UpdateCommitment {
                amount: Some(dec!(500)),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update");
    assert_eq!(updated.status, StoredStatus::Completed);

    let found = ledger
        .commitments
        .search_by_number(&commitment.commit_number)
        .await
        .expect("Failed to search");
    assert_eq!(found.balance.remaining, dec!(-100));
    assert_eq!(found.commitment.status, StoredStatus::Completed);
}

#[tokio::test]
async fn test_amount_still_above_payments_stays_active() {
    let ledger = ledger().await;
    let commitment = ledger
        .commitments
        .create(new_commitment("2025-03-15", dec!(1000)))
        .await
        .expect("Failed to create");
    ledger
        .payments
        .record(payment(commitment.id, dec!(600), "2025-03-16"))
        .await
        .expect("Failed to pay");

    let updated = ledger
        .commitments
        .update(
            commitment.id,
            UpdateCommitment {
                amount: Some(dec!(600.25)),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update");

    assert_eq!(updated.status, StoredStatus::Active);
    assert_eq!(updated.amount, dec!(600.25));
}

#[tokio::test]
async fn test_cancelled_commitment_keeps_its_status_when_amount_lowered() {
    let ledger = ledger().await;
    let commitment = ledger
        .commitments
        .create(new_commitment("2025-03-15", dec!(1000)))
        .await
        .expect("Failed to create");
    ledger
        .payments
        .record(payment(commitment.id, dec!(600), "2025-03-16"))
        .await
        .expect("Failed to pay");

    let updated = ledger
        .commitments
        .update(
            commitment.id,
            UpdateCommitment {
                amount: Some(dec!(500)),
                status: Some(CommitmentStatus::Cancelled),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update");

    assert_eq!(updated.status, StoredStatus::Cancelled);
}

#[tokio::test]
async fn test_amounts_beyond_float_precision_stay_exact() {
    let ledger = ledger().await;
    let commitment = ledger
        .commitments
        .create(new_commitment("2025-03-15", dec!(12345678901234567.891)))
        .await
        .expect("Failed to create");

    let recorded = ledger
        .payments
        .record(payment(commitment.id, dec!(0.001), "2025-03-16"))
        .await
        .expect("Failed to pay");
    assert_eq!(recorded.balance.remaining, dec!(12345678901234567.890));

    let recorded = ledger
        .payments
        .record(payment(commitment.id, dec!(12345678901234567.890), "2025-03-17"))
        .await
        .expect("Failed to pay");
    assert_eq!(recorded.balance.remaining, Decimal::ZERO);
    assert_eq!(recorded.commitment.status, StoredStatus::Completed);
    assert_eq!(recorded.commitment.amount, dec!(12345678901234567.891));
}
