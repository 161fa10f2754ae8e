//! medinfo-auth
//!
//! Password hashing and HS256 session tokens for users and doctors.

pub mod error;
pub mod jwt;
pub mod password;
