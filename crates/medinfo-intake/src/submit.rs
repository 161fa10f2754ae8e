use std::sync::Arc;

use tokio::task::JoinError;
use tracing::{info, warn};
use uuid::Uuid;

use medinfo_core::models::analysis::AnalysisResult;
use medinfo_core::models::prescription::{NewPrescription, Prescription};
use medinfo_core::object_keys;

use crate::collaborators::{ImageUploader, IntakeStore, PrescriptionAnalyzer};
use crate::error::IntakeError;
use crate::validate;

/// The image part of an intake request, already read into memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Raw form input. Identifiers arrive as text and are checked by `submit`.
#[derive(Debug, Clone, Default)]
pub struct IntakeRequest {
    pub file: Option<UploadedFile>,
    pub symptoms: String,
    pub user_id: String,
    pub doctor_identifier: String,
}

#[derive(Debug, Clone)]
pub struct IntakeOutcome {
    pub prescription: Prescription,
    pub analysis: AnalysisResult,
}

/// Runs prescription intakes against a fixed set of collaborators.
#[derive(Clone)]
pub struct Intake {
    uploader: Arc<dyn ImageUploader>,
    analyzer: Arc<dyn PrescriptionAnalyzer>,
    store: Arc<dyn IntakeStore>,
    bucket: String,
}

impl Intake {
    pub fn new(
        uploader: Arc<dyn ImageUploader>,
        analyzer: Arc<dyn PrescriptionAnalyzer>,
        store: Arc<dyn IntakeStore>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            uploader,
            analyzer,
            store,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Validate, then upload and analyze concurrently, then persist.
    ///
    /// Both sub-tasks always run to completion before either outcome is
    /// looked at. An upload failure wins over an analysis failure. Nothing is
    /// written to the database unless both succeeded. The prescription row is
    /// written before its items and is not removed if the item write fails.
    pub async fn submit(&self, request: IntakeRequest) -> Result<IntakeOutcome, IntakeError> {
        let IntakeRequest {
            file,
            symptoms,
            user_id,
            doctor_identifier,
        } = request;

        let file = file.ok_or_else(|| IntakeError::invalid("file is required"))?;
        validate::check_file_size(file.bytes.len())?;
        let content_type = validate::resolve_content_type(file.content_type.as_deref(), &file.bytes);
        validate::check_content_type(&content_type)?;
        validate::check_extension(&file.filename)?;
        let (user_id, doctor_identifier) =
            validate::check_identifiers(&user_id, &doctor_identifier)?;

        let doctor = self
            .store
            .find_doctor(&doctor_identifier)
            .await
            .map_err(IntakeError::DoctorLookup)?
            .ok_or(IntakeError::DoctorNotFound(doctor_identifier))?;

        let intake_id = Uuid::new_v4();
        let key = object_keys::prescription_image(
            &file.filename,
            jiff::Timestamp::now().as_nanosecond(),
        );
        info!(
            %intake_id,
            user_id,
            doctor_id = doctor.id,
            bucket = %self.bucket,
            key = %key,
            size = file.bytes.len(),
            "prescription intake started"
        );

        let image: Arc<[u8]> = file.bytes.into();

        let upload_task = {
            let uploader = Arc::clone(&self.uploader);
            let bucket = self.bucket.clone();
            let key = key.clone();
            let image = Arc::clone(&image);
            tokio::spawn(async move {
                uploader
                    .upload(&bucket, &key, image.to_vec(), Some(content_type.as_str()))
                    .await
            })
        };
        let analysis_task = {
            let analyzer = Arc::clone(&self.analyzer);
            let symptoms = symptoms.clone();
            let speciality = doctor.speciality.clone();
            tokio::spawn(async move { analyzer.analyze(&image, &symptoms, &speciality).await })
        };

        let (uploaded, analyzed) = tokio::join!(upload_task, analysis_task);

        let link = match uploaded.map_err(|e| task_failed("upload", e))? {
            Ok(link) => link,
            Err(e) => {
                warn!(%intake_id, error = %e, "image upload failed");
                return Err(IntakeError::Upload(e));
            }
        };
        let analysis = match analyzed.map_err(|e| task_failed("analysis", e))? {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(
                    %intake_id,
                    bucket = %self.bucket,
                    key = %key,
                    error = %e,
                    "analysis failed; uploaded image has no prescription"
                );
                return Err(IntakeError::Analysis(e));
            }
        };

        let new_items = analysis.to_new_items().map_err(IntakeError::Materialize)?;

        let prescription = self
            .store
            .insert_prescription(&NewPrescription {
                doc_id: doctor.id,
                user_id,
                symptoms,
                link,
            })
            .await
            .map_err(IntakeError::SavePrescription)?;

        if let Err(source) = self.store.insert_items(prescription.id, &new_items).await {
            warn!(
                %intake_id,
                prescription_id = prescription.id,
                items = new_items.len(),
                error = %source,
                "prescription saved without its items"
            );
            return Err(IntakeError::SaveItems {
                prescription_id: prescription.id,
                source,
            });
        }

        info!(
            %intake_id,
            prescription_id = prescription.id,
            items = new_items.len(),
            "prescription intake complete"
        );
        Ok(IntakeOutcome {
            prescription,
            analysis,
        })
    }
}

fn task_failed(task: &str, e: JoinError) -> IntakeError {
    IntakeError::Task(format!("{task} task: {e}"))
}
