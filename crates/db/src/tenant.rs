//! Tenant store registry.
//!
//! Every company owns a physically separate `SQLite` store at
//! `{tenants_dir}/company_{id}.sqlite`. The registry opens each store lazily
//! on first use, creates its schema if absent, and hands out the same pooled
//! connection to every later caller.
//!
//! # Usage
//!
//! ```ignore
//! use iltizam_db::{CommitmentRepository, TenantId, TenantRegistry};
//!
//! let registry = TenantRegistry::new("data/tenants", 5);
//! let store = registry.resolve(TenantId::new(42)?).await?;
//! let commitments = CommitmentRepository::new(store);
//!
//! // On shutdown
//! registry.shutdown().await?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use sea_orm::{DatabaseConnection, DbErr, RuntimeErr};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{connect_sqlite, schema};

/// Identifier of a company, used as the tenant key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct TenantId(i64);

/// Errors raised when building a tenant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TenantIdError {
    /// Identifier is zero or negative.
    #[error("company_id must be a positive integer, got {0}")]
    NotPositive(i64),

    /// Identifier is not an integer.
    #[error("company_id must be an integer, got '{0}'")]
    NotNumeric(String),
}

impl TenantId {
    /// Wraps a company id.
    ///
    /// # Errors
    ///
    /// Returns `TenantIdError::NotPositive` for ids below 1.
    pub const fn new(id: i64) -> Result<Self, TenantIdError> {
        if id < 1 {
            return Err(TenantIdError::NotPositive(id));
        }
        Ok(Self(id))
    }

    /// Returns the raw company id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TenantId {
    type Err = TenantIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<i64>()
            .map_err(|_| TenantIdError::NotNumeric(s.to_string()))?;
        Self::new(id)
    }
}

impl TryFrom<i64> for TenantId {
    type Error = TenantIdError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

/// Lazily opened, cached tenant stores.
#[derive(Debug)]
pub struct TenantRegistry {
    root: PathBuf,
    max_connections: u32,
    stores: RwLock<HashMap<TenantId, DatabaseConnection>>,
}

impl TenantRegistry {
    /// Creates a registry rooted at `root`. Nothing is opened yet.
    pub fn new(root: impl Into<PathBuf>, max_connections: u32) -> Self {
        Self {
            root: root.into(),
            max_connections,
            stores: RwLock::new(HashMap::new()),
        }
    }

    /// Path of the store file for `tenant`.
    #[must_use]
    pub fn store_path(&self, tenant: TenantId) -> PathBuf {
        self.root.join(format!("company_{}.sqlite", tenant.get()))
    }

    /// Returns the store of `tenant`, opening it and creating its schema on
    /// first use.
    ///
    /// Concurrent first requests for the same tenant open the store once.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, the file or the schema cannot be
    /// created.
    pub async fn resolve(&self, tenant: TenantId) -> Result<DatabaseConnection, DbErr> {
        if let Some(db) = self.stores.read().await.get(&tenant) {
            return Ok(db.clone());
        }

        let mut stores = self.stores.write().await;
        if let Some(db) = stores.get(&tenant) {
            return Ok(db.clone());
        }

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            DbErr::Conn(RuntimeErr::Internal(format!(
                "failed to create {}: {e}",
                self.root.display()
            )))
        })?;

        let path = self.store_path(tenant);
        let db = connect_sqlite(&path, self.max_connections).await?;
        schema::create_tenant_schema(&db).await?;

        info!(tenant = %tenant, path = %path.display(), "Tenant store opened");
        stores.insert(tenant, db.clone());
        Ok(db)
    }

    /// Number of stores currently open.
    pub async fn open_count(&self) -> usize {
        self.stores.read().await.len()
    }

    /// Closes every open store.
    ///
    /// Stores that fail to close are logged; the first failure is returned
    /// after all stores were attempted.
    ///
    /// # Errors
    ///
    /// Returns the first close error.
    pub async fn shutdown(&self) -> Result<(), DbErr> {
        let drained: Vec<_> = self.stores.write().await.drain().collect();
        let mut first_error = None;

        for (tenant, db) in drained {
            match db.close().await {
                Ok(()) => debug!(tenant = %tenant, "Tenant store closed"),
                Err(e) => {
                    warn!(tenant = %tenant, error = %e, "Failed to close tenant store");
                    first_error.get_or_insert(e);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}
