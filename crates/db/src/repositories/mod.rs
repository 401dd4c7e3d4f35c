//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! `commitment` and `payment` run against a tenant store; the others run
//! against the master store.

pub mod commitment;
pub mod company;
pub mod currency;
pub mod error;
pub mod payment;
pub mod registration;
pub mod user;

pub use commitment::{
    CommitmentError, CommitmentFilter, CommitmentRepository, CommitmentWithPayments,
    NewCommitment, UpdateCommitment,
};
pub use company::{
    CompanyRepository, CompanyWithCurrency, DEFAULT_CURRENCY, NewCompany, UpdateCompany,
};
pub use currency::{CurrencyRepository, NewCurrency, UpdateCurrency, normalize_code};
pub use error::DirectoryError;
pub use payment::{NewPayment, PaymentError, PaymentRepository, RecordedPayment};
pub use registration::{RegistrantAdmin, RegistrationRepository};
pub use user::{NewUser, UpdateUser, UserRepository};
