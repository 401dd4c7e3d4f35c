//! Company repository for master store operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use tracing::info;

use super::error::DirectoryError;
use crate::entities::{companies, currencies, users};
use crate::query::{ManyOf, ZeroOrOne};

/// Currency assigned to companies that do not choose one.
pub const DEFAULT_CURRENCY: &str = "SAR";

/// Input for creating a company.
#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    /// Company name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Tax registration number.
    pub tax_number: Option<String>,
    /// Currency code; `SAR` when absent.
    pub currency_code: Option<String>,
}

/// Partial update of a company. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateCompany {
    /// New name.
    pub name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New tax number.
    pub tax_number: Option<String>,
    /// New currency code.
    pub currency_code: Option<String>,
}

/// Company with the symbol of its currency.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyWithCurrency {
    /// The company record.
    #[serde(flatten)]
    pub company: companies::Model,
    /// Currency symbol; `None` if the currency row is missing.
    pub currency_symbol: Option<String>,
}

impl From<(companies::Model, Option<currencies::Model>)> for CompanyWithCurrency {
    fn from((company, currency): (companies::Model, Option<currencies::Model>)) -> Self {
        Self {
            company,
            currency_symbol: currency.map(|c| c.symbol),
        }
    }
}

/// Company repository.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a repository over the master store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists companies with their currency symbol, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<ManyOf<CompanyWithCurrency>, DbErr> {
        let rows = companies::Entity::find()
            .find_also_related(currencies::Entity)
            .order_by_asc(companies::Column::Id)
            .all(&self.db)
            .await?;

        Ok(ManyOf::from(rows).map(CompanyWithCurrency::from))
    }

    /// Finds a company with its currency symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, id: i64) -> Result<ZeroOrOne<CompanyWithCurrency>, DbErr> {
        let row = companies::Entity::find_by_id(id)
            .find_also_related(currencies::Entity)
            .one(&self.db)
            .await?;

        Ok(ZeroOrOne::from(row).map(CompanyWithCurrency::from))
    }

    /// Creates a company.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Invalid` for a blank name or unknown currency.
    pub async fn create(&self, input: NewCompany) -> Result<companies::Model, DirectoryError> {
        let company = insert_company(&self.db, input).await?;
        info!(company_id = company.id, name = %company.name, "Company created");
        Ok(company)
    }

    /// Updates a company.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if absent and
    /// `DirectoryError::Invalid` for a blank name or unknown currency.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateCompany,
    ) -> Result<companies::Model, DirectoryError> {
        let existing = companies::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DirectoryError::not_found("Company", id))?;

        let mut active: companies::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(required_name(&name)?);
        }
        if let Some(email) = input.email {
            active.email = Set(Some(email));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }
        if let Some(tax_number) = input.tax_number {
            active.tax_number = Set(Some(tax_number));
        }
        if let Some(code) = input.currency_code {
            active.currency_code = Set(known_currency(&self.db, &code).await?);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a company no user belongs to.
    ///
    /// The tenant store file is left on disk.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if absent and `DirectoryError::InUse`
    /// while users reference it.
    pub async fn delete(&self, id: i64) -> Result<(), DirectoryError> {
        if companies::Entity::find_by_id(id).one(&self.db).await?.is_none() {
            return Err(DirectoryError::not_found("Company", id));
        }

        let members = users::Entity::find()
            .filter(users::Column::CompanyId.eq(id))
            .count(&self.db)
            .await?;
        if members > 0 {
            return Err(DirectoryError::InUse(format!(
                "Company {id} still has {members} user(s)"
            )));
        }

        companies::Entity::delete_by_id(id).exec(&self.db).await?;
        info!(company_id = id, "Company deleted");
        Ok(())
    }
}

/// Inserts a company on any connection, including an open transaction.
pub(crate) async fn insert_company<C: ConnectionTrait>(
    db: &C,
    input: NewCompany,
) -> Result<companies::Model, DirectoryError> {
    let name = required_name(&input.name)?;
    let currency_code = known_currency(
        db,
        input.currency_code.as_deref().unwrap_or(DEFAULT_CURRENCY),
    )
    .await?;
    let now = Utc::now();

    let company = companies::ActiveModel {
        name: Set(name),
        email: Set(input.email),
        phone: Set(input.phone),
        address: Set(input.address),
        tax_number: Set(input.tax_number),
        currency_code: Set(currency_code),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(company.insert(db).await?)
}

fn required_name(name: &str) -> Result<String, DirectoryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DirectoryError::Invalid("Company name is required".into()));
    }
    Ok(name.to_string())
}

async fn known_currency<C: ConnectionTrait>(db: &C, code: &str) -> Result<String, DirectoryError> {
    let code = code.trim().to_ascii_uppercase();
    match currencies::Entity::find_by_id(code.clone()).one(db).await? {
        Some(currency) => Ok(currency.code),
        None => Err(DirectoryError::Invalid(format!("Unknown currency '{code}'"))),
    }
}
