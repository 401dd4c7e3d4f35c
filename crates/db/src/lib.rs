//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the master and tenant stores
//! - The tenant store registry, one `SQLite` file per company
//! - Repository abstractions for data access
//! - Declarative schema creation and first-boot seeding

pub mod entities;
pub mod query;
pub mod repositories;
pub mod schema;
pub mod seed;
pub mod tenant;

pub use query::{ManyOf, ZeroOrOne};
pub use repositories::{
    CommitmentRepository, CompanyRepository, CurrencyRepository, PaymentRepository,
    RegistrationRepository, UserRepository,
};
pub use tenant::{TenantId, TenantIdError, TenantRegistry};

use std::path::Path;
use std::time::Duration;

use sea_orm::{DatabaseConnection, DbErr, RuntimeErr, SqlxSqliteConnector};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

/// Opens (creating if missing) the `SQLite` store at `path`.
///
/// Foreign keys are enforced on every pooled connection and the store runs in
/// WAL mode, so readers do not block the single writer.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or the pool cannot be built.
pub async fn connect_sqlite(path: &Path, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await
        .map_err(|e| {
            DbErr::Conn(RuntimeErr::Internal(format!(
                "failed to open {}: {e}",
                path.display()
            )))
        })?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}
