//! Core business logic for Iltizam.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Password hashing and user roles
//! - `commitment` - Commitment status, reference numbering, and list sorting
//! - `ledger` - Payment validation and commitment settlement

pub mod auth;
pub mod commitment;
pub mod ledger;
