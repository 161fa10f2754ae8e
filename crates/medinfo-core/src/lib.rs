//! medinfo-core
//!
//! Pure domain types, item materialization, and storage key conventions.
//! No network or database dependency. This is the shared vocabulary of the
//! MedInfo backend.

pub mod error;
pub mod models;
pub mod object_keys;
