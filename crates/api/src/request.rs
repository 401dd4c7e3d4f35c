//! Helpers for reading request payloads.

use chrono::NaiveDate;
use iltizam_core::commitment::{CommitmentStatus, DUE_DATE_FORMAT};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ApiError;

/// Returns a required field or a validation error naming it.
///
/// Blank strings count as missing.
///
/// # Errors
///
/// Returns a validation error if the field is absent.
pub fn required<T: Present>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value
        .filter(Present::is_present)
        .ok_or_else(|| ApiError::validation(format!("{field} is required")))
}

/// Values that can be checked for presence.
pub trait Present {
    /// Returns false for values treated as missing.
    fn is_present(&self) -> bool;
}

impl Present for String {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Present for rust_decimal::Decimal {
    fn is_present(&self) -> bool {
        true
    }
}

impl Present for i64 {
    fn is_present(&self) -> bool {
        true
    }
}

/// Parses a `YYYY-MM-DD` date field.
///
/// # Errors
///
/// Returns a validation error naming the field.
pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT)
        .map_err(|_| ApiError::validation(format!("{field} must be a YYYY-MM-DD date, got '{raw}'")))
}

/// Parses an optional status field.
///
/// # Errors
///
/// Returns a validation error for unknown statuses.
pub fn parse_status(raw: Option<&str>) -> Result<Option<CommitmentStatus>, ApiError> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<CommitmentStatus>())
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))
}

/// Turns a JSON `company_id` (number or string) into its raw text.
#[must_use]
pub fn company_param(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Deserializes a field that distinguishes "absent" from "null".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`.
///
/// # Errors
///
/// Propagates the inner deserializer error.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
