//! The three services an intake talks to.
//!
//! Methods return boxed futures so the orchestrator can hold them as
//! `Arc<dyn Trait>` and hand clones to spawned tasks.

use std::future::Future;
use std::pin::Pin;

use sqlx::PgPool;

use medinfo_analysis::analyze::analyze_prescription;
use medinfo_analysis::client::AnalysisClient;
use medinfo_analysis::error::AnalysisError;
use medinfo_core::models::analysis::AnalysisResult;
use medinfo_core::models::doctor::Doctor;
use medinfo_core::models::item::{Item, NewItem};
use medinfo_core::models::prescription::{NewPrescription, Prescription};
use medinfo_db::error::DbError;
use medinfo_db::{doctors, items, prescriptions};
use medinfo_storage::client::StorageClient;
use medinfo_storage::error::StorageError;
use medinfo_storage::objects::upload_object;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Puts an image in object storage and returns its public URL.
pub trait ImageUploader: Send + Sync {
    fn upload<'a>(
        &'a self,
        bucket: &'a str,
        key: &'a str,
        bytes: Vec<u8>,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, StorageError>>;
}

/// Turns an image plus context into test and medicine findings.
pub trait PrescriptionAnalyzer: Send + Sync {
    fn analyze<'a>(
        &'a self,
        image: &'a [u8],
        symptoms: &'a str,
        doctor_speciality: &'a str,
    ) -> BoxFuture<'a, Result<AnalysisResult, AnalysisError>>;
}

/// The slice of the persistence gateway an intake needs.
pub trait IntakeStore: Send + Sync {
    fn find_doctor<'a>(
        &'a self,
        identifier: &'a str,
    ) -> BoxFuture<'a, Result<Option<Doctor>, DbError>>;

    fn insert_prescription<'a>(
        &'a self,
        new: &'a NewPrescription,
    ) -> BoxFuture<'a, Result<Prescription, DbError>>;

    fn insert_items<'a>(
        &'a self,
        pres_id: i64,
        items: &'a [NewItem],
    ) -> BoxFuture<'a, Result<Vec<Item>, DbError>>;
}

impl ImageUploader for StorageClient {
    fn upload<'a>(
        &'a self,
        bucket: &'a str,
        key: &'a str,
        bytes: Vec<u8>,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(upload_object(self, bucket, key, bytes, content_type))
    }
}

impl PrescriptionAnalyzer for AnalysisClient {
    fn analyze<'a>(
        &'a self,
        image: &'a [u8],
        symptoms: &'a str,
        doctor_speciality: &'a str,
    ) -> BoxFuture<'a, Result<AnalysisResult, AnalysisError>> {
        Box::pin(analyze_prescription(self, image, symptoms, doctor_speciality))
    }
}

impl IntakeStore for PgPool {
    fn find_doctor<'a>(
        &'a self,
        identifier: &'a str,
    ) -> BoxFuture<'a, Result<Option<Doctor>, DbError>> {
        Box::pin(doctors::find_doctor_by_identifier(self, identifier))
    }

    fn insert_prescription<'a>(
        &'a self,
        new: &'a NewPrescription,
    ) -> BoxFuture<'a, Result<Prescription, DbError>> {
        Box::pin(prescriptions::insert_prescription(self, new))
    }

    fn insert_items<'a>(
        &'a self,
        pres_id: i64,
        new_items: &'a [NewItem],
    ) -> BoxFuture<'a, Result<Vec<Item>, DbError>> {
        Box::pin(items::insert_items_bulk(self, pres_id, new_items))
    }
}
