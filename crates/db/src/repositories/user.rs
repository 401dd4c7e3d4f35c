//! User repository for master store operations.
//!
//! Passwords arrive here already hashed; hashing happens in the caller via
//! `iltizam_core::auth::hash_password`.

use chrono::Utc;
use iltizam_core::auth::UserRole;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::error::DirectoryError;
use crate::entities::{companies, users};
use crate::query::{ManyOf, ZeroOrOne};

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// Argon2id PHC hash of the password.
    pub password_hash: String,
    /// Display name.
    pub full_name: Option<String>,
    /// Company the user belongs to; `None` for system administrators.
    pub company_id: Option<i64>,
    /// Role.
    pub role: UserRole,
}

/// Partial update of a user. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    /// New display name.
    pub full_name: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
    /// Enable or disable login.
    pub is_active: Option<bool>,
    /// Move the user: `Some(None)` detaches it from any company.
    pub company_id: Option<Option<i64>>,
    /// New password hash.
    pub password_hash: Option<String>,
}

/// User repository.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a repository over the master store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<ZeroOrOne<users::Model>, DbErr> {
        users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map(ZeroOrOne::from)
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<ZeroOrOne<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username.trim()))
            .one(&self.db)
            .await
            .map(ZeroOrOne::from)
    }

    /// Lists users ordered by id, optionally restricted to one company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, company_id: Option<i64>) -> Result<ManyOf<users::Model>, DbErr> {
        let mut query = users::Entity::find();
        if let Some(company_id) = company_id {
            query = query.filter(users::Column::CompanyId.eq(company_id));
        }

        query
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .map(ManyOf::from)
    }

    /// Creates an active user.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::AlreadyExists` for a taken username and
    /// `DirectoryError::Invalid` for a blank username or unknown company.
    pub async fn create(&self, input: NewUser) -> Result<users::Model, DirectoryError> {
        let user = insert_user(&self.db, input).await?;
        info!(user_id = user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Updates a user.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if absent and
    /// `DirectoryError::Invalid` for an unknown company.
    pub async fn update(&self, id: i64, input: UpdateUser) -> Result<users::Model, DirectoryError> {
        let existing = self
            .find_by_id(id)
            .await?
            .required(|| DirectoryError::not_found("User", id))?;

        let mut active: users::ActiveModel = existing.into();
        if let Some(full_name) = input.full_name {
            active.full_name = Set(Some(full_name));
        }
        if let Some(role) = input.role {
            active.role = Set(role.into());
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(company_id) = input.company_id {
            if let Some(company_id) = company_id {
                ensure_company(&self.db, company_id).await?;
            }
            active.company_id = Set(company_id);
        }
        if let Some(password_hash) = input.password_hash {
            active.password_hash = Set(password_hash);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a user.
    ///
    /// Callers cannot delete themselves, and the bootstrap administrator
    /// (identified by `bootstrap_username`) is never deleted.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if absent and
    /// `DirectoryError::Protected` for a protected user.
    pub async fn delete(
        &self,
        id: i64,
        caller_id: i64,
        bootstrap_username: &str,
    ) -> Result<(), DirectoryError> {
        let user = self
            .find_by_id(id)
            .await?
            .required(|| DirectoryError::not_found("User", id))?;

        if user.id == caller_id {
            return Err(DirectoryError::Protected("You cannot delete yourself".into()));
        }
        if user.username == bootstrap_username {
            return Err(DirectoryError::Protected(
                "The bootstrap administrator cannot be deleted".into(),
            ));
        }

        users::Entity::delete_by_id(id).exec(&self.db).await?;
        info!(user_id = id, username = %user.username, "User deleted");
        Ok(())
    }
}

/// Inserts a user on any connection, including an open transaction.
pub(crate) async fn insert_user<C: ConnectionTrait>(
    db: &C,
    input: NewUser,
) -> Result<users::Model, DirectoryError> {
    let username = input.username.trim().to_string();
    if username.is_empty() {
        return Err(DirectoryError::Invalid("Username is required".into()));
    }
    if let Some(company_id) = input.company_id {
        ensure_company(db, company_id).await?;
    }
    let taken = users::Entity::find()
        .filter(users::Column::Username.eq(username.as_str()))
        .one(db)
        .await?
        .is_some();
    if taken {
        return Err(DirectoryError::AlreadyExists {
            entity: "User",
            key: username,
        });
    }

    let now = Utc::now();
    let user = users::ActiveModel {
        username: Set(username.clone()),
        password_hash: Set(input.password_hash),
        full_name: Set(input.full_name),
        company_id: Set(input.company_id),
        role: Set(input.role.into()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    user.insert(db)
        .await
        .map_err(DirectoryError::on_unique("User", &username))
}

async fn ensure_company<C: ConnectionTrait>(db: &C, company_id: i64) -> Result<(), DirectoryError> {
    if companies::Entity::find_by_id(company_id).one(db).await?.is_none() {
        return Err(DirectoryError::Invalid(format!(
            "Unknown company {company_id}"
        )));
    }
    Ok(())
}
