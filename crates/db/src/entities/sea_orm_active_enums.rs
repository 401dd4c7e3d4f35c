//! `SeaORM` active enums stored as text columns.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use iltizam_core::auth::UserRole as DomainUserRole;
use iltizam_core::commitment::CommitmentStatus as DomainCommitmentStatus;

/// Stored commitment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum CommitmentStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<DomainCommitmentStatus> for CommitmentStatus {
    fn from(status: DomainCommitmentStatus) -> Self {
        match status {
            DomainCommitmentStatus::Active => Self::Active,
            DomainCommitmentStatus::Completed => Self::Completed,
            DomainCommitmentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CommitmentStatus> for DomainCommitmentStatus {
    fn from(status: CommitmentStatus) -> Self {
        match status {
            CommitmentStatus::Active => Self::Active,
            CommitmentStatus::Completed => Self::Completed,
            CommitmentStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Stored user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "user")]
    User,
}

impl From<DomainUserRole> for UserRole {
    fn from(role: DomainUserRole) -> Self {
        match role {
            DomainUserRole::Admin => Self::Admin,
            DomainUserRole::User => Self::User,
        }
    }
}

impl From<UserRole> for DomainUserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::User => Self::User,
        }
    }
}
