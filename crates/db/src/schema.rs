//! Declarative schema creation.
//!
//! Tables are derived from the entity definitions and created only when
//! absent, so opening an existing store leaves its data untouched. There is
//! no versioned migration history.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};

use crate::entities::{commitments, companies, currencies, payments, users};

/// Creates the master tables (`currencies`, `companies`, `users`) if absent.
///
/// # Errors
///
/// Returns an error if a DDL statement fails.
pub async fn create_master_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_table(db, currencies::Entity).await?;
    create_table(db, companies::Entity).await?;
    create_table(db, users::Entity).await?;
    Ok(())
}

/// Creates the tenant tables (`commitments`, `payments`) if absent.
///
/// # Errors
///
/// Returns an error if a DDL statement fails.
pub async fn create_tenant_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_table(db, commitments::Entity).await?;
    create_table(db, payments::Entity).await?;
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait + Copy,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(backend.build(&table)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }

    Ok(())
}
