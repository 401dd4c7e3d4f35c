//! Shared fixtures for db integration tests.
//!
//! Every fixture lives in its own temporary directory, so tests run against
//! real `SQLite` files and never share state.

#![allow(dead_code)]

use chrono::NaiveDate;
use iltizam_db::repositories::NewCommitment;
use iltizam_db::{TenantId, TenantRegistry, connect_sqlite, seed};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Temporary data directory with a tenant registry.
pub struct TenantFixture {
    pub dir: TempDir,
    pub registry: TenantRegistry,
}

impl TenantFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let registry = TenantRegistry::new(dir.path().join("tenants"), 2);
        Self { dir, registry }
    }

    pub async fn store(&self, id: i64) -> DatabaseConnection {
        self.registry
            .resolve(tenant(id))
            .await
            .expect("Failed to open tenant store")
    }
}

/// Temporary master store, seeded like a first boot.
pub struct MasterFixture {
    pub dir: TempDir,
    pub db: DatabaseConnection,
}

impl MasterFixture {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db = connect_sqlite(&dir.path().join("master.sqlite"), 1)
            .await
            .expect("Failed to open master store");
        seed::bootstrap(&db, ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .expect("Failed to seed master store");
        Self { dir, db }
    }
}

pub fn tenant(id: i64) -> TenantId {
    TenantId::new(id).expect("valid tenant id")
}

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
}

pub fn new_commitment(due_date: &str, amount: Decimal) -> NewCommitment {
    NewCommitment {
        due_date: date(due_date),
        account: "Rent".to_string(),
        description: format!("Obligation due {due_date}"),
        amount,
        status: None,
    }
}
