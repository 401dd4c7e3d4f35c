//! Commitment domain rules.
//!
//! This module provides:
//! - Commitment status values and transitions
//! - Month-scoped reference numbering (`YYYY-MM-NNN`)
//! - The sort allow-list used when listing commitments

pub mod numbering;
pub mod sort;
pub mod status;

#[cfg(test)]
mod numbering_props;

pub use numbering::{
    DUE_DATE_FORMAT, NumberingError, format_commit_number, month_prefix, next_commit_number, parse_due_date,
    parse_sequence,
};
pub use sort::{CommitmentSort, SortField, SortOrder};
pub use status::{CommitmentStatus, StatusParseError};
