//! medinfo-storage
//!
//! Object storage uploads over the storage REST API. Thin wrapper around
//! `reqwest`.

pub mod client;
pub mod error;
pub mod objects;
