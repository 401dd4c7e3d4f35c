//! Currency repository for master store operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::error::DirectoryError;
use crate::entities::{companies, currencies};
use crate::query::{ManyOf, ZeroOrOne};

/// Input for creating a currency.
#[derive(Debug, Clone)]
pub struct NewCurrency {
    /// ISO 4217 code, e.g. `SAR`.
    pub code: String,
    /// English name.
    pub name_en: String,
    /// Arabic name.
    pub name_ar: String,
    /// Display symbol.
    pub symbol: String,
}

/// Partial update of a currency. The code cannot change.
#[derive(Debug, Clone, Default)]
pub struct UpdateCurrency {
    /// New English name.
    pub name_en: Option<String>,
    /// New Arabic name.
    pub name_ar: Option<String>,
    /// New symbol.
    pub symbol: Option<String>,
}

/// Normalizes and validates a currency code (three ASCII letters).
///
/// # Errors
///
/// Returns `DirectoryError::Invalid` for malformed codes.
pub fn normalize_code(code: &str) -> Result<String, DirectoryError> {
    let code = code.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(DirectoryError::Invalid(format!(
            "Invalid currency code '{code}', expected three letters"
        )));
    }
    Ok(code)
}

/// Currency repository.
#[derive(Debug, Clone)]
pub struct CurrencyRepository {
    db: DatabaseConnection,
}

impl CurrencyRepository {
    /// Creates a repository over the master store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all currencies ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<ManyOf<currencies::Model>, DbErr> {
        currencies::Entity::find()
            .order_by_asc(currencies::Column::Code)
            .all(&self.db)
            .await
            .map(ManyOf::from)
    }

    /// Finds a currency by code (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, code: &str) -> Result<ZeroOrOne<currencies::Model>, DbErr> {
        currencies::Entity::find_by_id(code.trim().to_ascii_uppercase())
            .one(&self.db)
            .await
            .map(ZeroOrOne::from)
    }

    /// Creates a currency.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::AlreadyExists` for a duplicate code.
    pub async fn create(&self, input: NewCurrency) -> Result<currencies::Model, DirectoryError> {
        let code = normalize_code(&input.code)?;
        if self.find(&code).await?.is_some() {
            return Err(DirectoryError::AlreadyExists {
                entity: "Currency",
                key: code,
            });
        }

        let currency = currencies::ActiveModel {
            code: Set(code.clone()),
            name_en: Set(input.name_en),
            name_ar: Set(input.name_ar),
            symbol: Set(input.symbol),
        }
        .insert(&self.db)
        .await
        .map_err(DirectoryError::on_unique("Currency", &code))?;

        info!(code = %currency.code, "Currency created");
        Ok(currency)
    }

    /// Updates a currency's names or symbol.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the currency does not exist.
    pub async fn update(
        &self,
        code: &str,
        input: UpdateCurrency,
    ) -> Result<currencies::Model, DirectoryError> {
        let existing = self
            .find(code)
            .await?
            .required(|| DirectoryError::not_found("Currency", code))?;

        let mut active: currencies::ActiveModel = existing.into();
        if let Some(name_en) = input.name_en {
            active.name_en = Set(name_en);
        }
        if let Some(name_ar) = input.name_ar {
            active.name_ar = Set(name_ar);
        }
        if let Some(symbol) = input.symbol {
            active.symbol = Set(symbol);
        }

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a currency no company uses.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if absent and `DirectoryError::InUse`
    /// while any company references it.
    pub async fn delete(&self, code: &str) -> Result<(), DirectoryError> {
        let existing = self
            .find(code)
            .await?
            .required(|| DirectoryError::not_found("Currency", code))?;

        let in_use = companies::Entity::find()
            .filter(companies::Column::CurrencyCode.eq(existing.code.as_str()))
            .count(&self.db)
            .await?;
        if in_use > 0 {
            return Err(DirectoryError::InUse(format!(
                "Currency '{}' is used by {in_use} compan{}",
                existing.code,
                if in_use == 1 { "y" } else { "ies" }
            )));
        }

        currencies::Entity::delete_by_id(existing.code.clone())
            .exec(&self.db)
            .await?;

        info!(code = %existing.code, "Currency deleted");
        Ok(())
    }
}
