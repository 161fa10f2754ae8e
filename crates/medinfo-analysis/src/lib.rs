//! medinfo-analysis
//!
//! Client for the prescription analysis service, and the bounded retry
//! policy it runs under.

pub mod analyze;
pub mod client;
pub mod error;
pub mod retry;
