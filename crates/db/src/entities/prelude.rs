//! Entity re-exports.

pub use super::commitments::Entity as Commitments;
pub use super::companies::Entity as Companies;
pub use super::currencies::Entity as Currencies;
pub use super::payments::Entity as Payments;
pub use super::users::Entity as Users;
