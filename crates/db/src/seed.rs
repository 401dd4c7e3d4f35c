//! First-boot seeding of the master store.

use chrono::Utc;
use iltizam_core::auth::hash_password;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tracing::info;

use crate::entities::{currencies, sea_orm_active_enums::UserRole, users};
use crate::repositories::DirectoryError;
use crate::schema;

/// Currencies inserted into an empty currency table: code, English name,
/// Arabic name, symbol.
pub const DEFAULT_CURRENCIES: [(&str, &str, &str, &str); 9] = [
    ("SAR", "Saudi Riyal", "ريال سعودي", "ر.س"),
    ("USD", "US Dollar", "دولار أمريكي", "$"),
    ("EUR", "Euro", "يورو", "€"),
    ("GBP", "British Pound", "جنيه إسترليني", "£"),
    ("AED", "UAE Dirham", "درهم إماراتي", "د.إ"),
    ("KWD", "Kuwaiti Dinar", "دينار كويتي", "د.ك"),
    ("QAR", "Qatari Riyal", "ريال قطري", "ر.ق"),
    ("BHD", "Bahraini Dinar", "دينار بحريني", "د.ب"),
    ("OMR", "Omani Rial", "ريال عماني", "ر.ع"),
];

/// What a bootstrap run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Number of currencies inserted.
    pub currencies_inserted: usize,
    /// Whether the bootstrap administrator was created.
    pub admin_created: bool,
}

/// Prepares the master store: schema, default currencies, bootstrap admin.
///
/// Safe to run on every start; existing data is never modified.
///
/// # Errors
///
/// Returns an error if schema creation, hashing, or an insert fails.
pub async fn bootstrap(
    db: &DatabaseConnection,
    admin_username: &str,
    admin_password: &str,
) -> Result<SeedReport, DirectoryError> {
    schema::create_master_schema(db).await?;

    let report = SeedReport {
        currencies_inserted: seed_currencies(db).await?,
        admin_created: seed_admin(db, admin_username, admin_password).await?,
    };

    info!(
        currencies_inserted = report.currencies_inserted,
        admin_created = report.admin_created,
        "Master store ready"
    );
    Ok(report)
}

async fn seed_currencies(db: &DatabaseConnection) -> Result<usize, DirectoryError> {
    if currencies::Entity::find().count(db).await? > 0 {
        return Ok(0);
    }

    let rows = DEFAULT_CURRENCIES
        .iter()
        .map(|(code, name_en, name_ar, symbol)| currencies::ActiveModel {
            code: Set((*code).to_string()),
            name_en: Set((*name_en).to_string()),
            name_ar: Set((*name_ar).to_string()),
            symbol: Set((*symbol).to_string()),
        });
    currencies::Entity::insert_many(rows).exec(db).await?;

    Ok(DEFAULT_CURRENCIES.len())
}

async fn seed_admin(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<bool, DirectoryError> {
    let exists = users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .count(db)
        .await?
        > 0;
    if exists {
        return Ok(false);
    }

    let now = Utc::now();
    users::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password)?),
        full_name: Set(Some("System Administrator".to_string())),
        company_id: Set(None),
        role: Set(UserRole::Admin),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(username, "Bootstrap administrator created");
    Ok(true)
}
