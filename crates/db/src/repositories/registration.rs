//! Self-service company registration.

use iltizam_core::auth::UserRole;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::info;

use super::company::{NewCompany, insert_company};
use super::error::DirectoryError;
use super::user::{NewUser, insert_user};
use crate::entities::{companies, users};

/// First administrator of a newly registered company.
#[derive(Debug, Clone)]
pub struct RegistrantAdmin {
    /// Unique login name.
    pub username: String,
    /// Argon2id PHC hash of the password.
    pub password_hash: String,
    /// Display name.
    pub full_name: Option<String>,
}

/// Registration repository.
#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    db: DatabaseConnection,
}

impl RegistrationRepository {
    /// Creates a repository over the master store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a company and its first administrator in one transaction.
    ///
    /// If the user cannot be created the company insert is rolled back.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::AlreadyExists` for a taken username and
    /// `DirectoryError::Invalid` for a blank company name or unknown currency.
    pub async fn register(
        &self,
        company: NewCompany,
        admin: RegistrantAdmin,
    ) -> Result<(companies::Model, users::Model), DirectoryError> {
        let txn = self.db.begin().await?;

        let company = insert_company(&txn, company).await?;
        let user = insert_user(
            &txn,
            NewUser {
                username: admin.username,
                password_hash: admin.password_hash,
                full_name: admin.full_name,
                company_id: Some(company.id),
                role: UserRole::Admin,
            },
        )
        .await?;

        txn.commit().await?;

        info!(
            company_id = company.id,
            user_id = user.id,
            username = %user.username,
            "Company registered"
        );
        Ok((company, user))
    }
}
