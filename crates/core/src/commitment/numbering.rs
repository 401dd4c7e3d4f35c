//! Commitment reference numbering.
//!
//! Reference numbers have the form `{year:4}-{month:02}-{sequence:03}` and are
//! scoped to one tenant and one calendar month of the commitment's due date.
//!
//! The sequence is derived from the highest existing number for the month.
//! The suffix is zero-padded to three digits and widens past 999, so the store
//! finds the numeric maximum by ordering on length first, then on the string.
//!
//! Reading the maximum and inserting the next number are two separate steps.
//! Concurrent creations for the same tenant and month can therefore compute the
//! same number; the unique index on `commit_number` rejects the second insert.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Width of the zero-padded sequence suffix.
pub const SEQUENCE_WIDTH: usize = 3;

/// Date format accepted for due dates.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors that can occur while numbering a commitment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberingError {
    /// The due date could not be parsed.
    #[error("Invalid due date '{0}', expected YYYY-MM-DD")]
    InvalidDueDate(String),
}

/// Parses a `YYYY-MM-DD` due date.
///
/// # Errors
///
/// Returns `NumberingError::InvalidDueDate` if the input is not a valid date.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, NumberingError> {
    NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT)
        .map_err(|_| NumberingError::InvalidDueDate(raw.to_string()))
}

/// Returns the `YYYY-MM-` prefix shared by all numbers of the due date's month.
#[must_use]
pub fn month_prefix(due_date: NaiveDate) -> String {
    format!("{:04}-{:02}-", due_date.year(), due_date.month())
}

/// Formats a reference number for the given month and sequence.
#[must_use]
pub fn format_commit_number(due_date: NaiveDate, sequence: u32) -> String {
    format!(
        "{}{sequence:0width$}",
        month_prefix(due_date),
        width = SEQUENCE_WIDTH
    )
}

/// Extracts the numeric sequence from a reference number with the given prefix.
///
/// Returns `None` if the number does not carry the prefix or the suffix is
/// not a number.
#[must_use]
pub fn parse_sequence(commit_number: &str, prefix: &str) -> Option<u32> {
    commit_number
        .strip_prefix(prefix)
        .filter(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|suffix| suffix.parse().ok())
}

/// Computes the next reference number for a due date.
///
/// `previous_max` is the highest existing number for the due date's month in
/// the tenant's store. Without one, or if it cannot be parsed, the sequence
/// starts at 1.
#[must_use]
pub fn next_commit_number(due_date: NaiveDate, previous_max: Option<&str>) -> String {
    let prefix = month_prefix(due_date);
    let sequence = previous_max
        .and_then(|max| parse_sequence(max, &prefix))
        .map_or(1, |last| last.saturating_add(1));

    format_commit_number(due_date, sequence)
}
