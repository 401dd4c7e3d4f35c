//! `SeaORM` entity definitions.
//!
//! Entities live in two kinds of store. The master store holds `companies`,
//! `users` and `currencies`; every tenant store holds its own `commitments`
//! and `payments`. Relations never cross from one kind of store to the other.

pub mod prelude;

pub mod commitments;
pub mod companies;
pub mod currencies;
pub mod money;
pub mod payments;
pub mod sea_orm_active_enums;
pub mod users;
