//! Commitment status values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a commitment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentStatus {
    /// Open obligation, still accepting payments.
    #[default]
    Active,
    /// Fully covered by payments.
    Completed,
    /// Withdrawn by the company.
    Cancelled,
}

/// Error returned when a status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid status '{0}', expected one of: active, completed, cancelled")]
pub struct StatusParseError(pub String);

impl CommitmentStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for CommitmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommitmentStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}
