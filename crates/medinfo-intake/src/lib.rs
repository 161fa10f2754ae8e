//! medinfo-intake
//!
//! Prescription intake: validate an uploaded image, upload it and have it
//! analyzed at the same time, then record the prescription and the items
//! derived from the analysis.

pub mod collaborators;
pub mod error;
pub mod submit;
pub mod validate;

pub use submit::{Intake, IntakeOutcome, IntakeRequest, UploadedFile};
