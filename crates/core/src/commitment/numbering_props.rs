//! Property-based tests for commitment reference numbering.

use chrono::NaiveDate;
use proptest::prelude::*;

use super::numbering::{month_prefix, next_commit_number, parse_sequence};

/// Strategy to generate any valid calendar date in a four-digit year.
fn due_date() -> impl Strategy<Value = NaiveDate> {
    (1000i32..=9999, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Repeatedly numbering within one month yields a dense, strictly
    /// increasing sequence starting at 1.
    #[test]
    fn prop_sequence_is_dense_and_increasing(date in due_date(), count in 1usize..60) {
        let prefix = month_prefix(date);
        let mut previous: Option<String> = None;

        for expected in 1..=count {
            let next = next_commit_number(date, previous.as_deref());
            prop_assert!(next.starts_with(&prefix));
            prop_assert_eq!(parse_sequence(&next, &prefix), Some(u32::try_from(expected).unwrap()));
            if let Some(prev) = &previous {
                prop_assert!(next.as_str() > prev.as_str());
            }
            previous = Some(next);
        }
    }

    /// Within the three-digit range, string order matches sequence order.
    #[test]
    fn prop_lexicographic_order_matches_numeric(date in due_date(), a in 1u32..=999, b in 1u32..=999) {
        let prefix = month_prefix(date);
        let left = format!("{prefix}{a:03}");
        let right = format!("{prefix}{b:03}");

        prop_assert_eq!(left.cmp(&right), a.cmp(&b));
    }

    /// The generated number always encodes the due date's year and month.
    #[test]
    fn prop_number_encodes_due_month(date in due_date()) {
        let number = next_commit_number(date, None);
        let prefix = month_prefix(date);
        prop_assert_eq!(&number[..8], prefix.as_str());
        prop_assert_eq!(number.len(), 11);
    }
}
