//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - User role definitions

mod password;

pub use password::{MIN_PASSWORD_LENGTH, PasswordError, hash_password, validate_password, verify_password};

use serde::{Deserialize, Serialize};

/// User roles.
///
/// An `Admin` without a company is the system administrator; an `Admin` bound
/// to a company administers that company only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Administrator.
    Admin,
    /// Regular company user.
    #[default]
    User,
}

impl UserRole {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Returns true if this role can manage users of its scope.
    #[must_use]
    pub const fn can_manage_users(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("Invalid role '{s}', expected admin or user")),
        }
    }
}
