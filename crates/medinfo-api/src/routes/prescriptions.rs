use axum::extract::multipart::Field;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use medinfo_core::models::analysis::AnalysisResult;
use medinfo_core::models::prescription::{Prescription, PrescriptionWithItems};
use medinfo_db::prescriptions;
use medinfo_intake::validate::MAX_FILE_BYTES;
use medinfo_intake::{IntakeRequest, UploadedFile};

use crate::error::ApiError;
use crate::routes::{required_id, IdParams};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrescriptionResponse {
    pub prescription: Prescription,
    pub ai_analysis: AnalysisResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeenUpdate {
    pub seen_by_patient: bool,
}

pub async fn list_prescriptions(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<Vec<Prescription>>, ApiError> {
    let user_id = required_id(params.user_id.as_deref(), "user ID")?;
    Ok(Json(
        prescriptions::list_user_prescriptions(&state.pool, user_id).await?,
    ))
}

/// Multipart intake: `file`, `symptoms`, `userId`, `doctorUsername`.
pub async fn create_prescription(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreatePrescriptionResponse>), ApiError> {
    let mut request = IntakeRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => request.file = Some(read_file(field).await?),
            "symptoms" => request.symptoms = field.text().await?,
            "userId" => request.user_id = field.text().await?,
            "doctorUsername" => request.doctor_identifier = field.text().await?,
            _ => {}
        }
    }

    let outcome = state.intake.submit(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatePrescriptionResponse {
            prescription: outcome.prescription,
            ai_analysis: outcome.analysis,
        }),
    ))
}

/// Buffer the file part, giving up as soon as it passes the size cap.
async fn read_file(mut field: Field<'_>) -> Result<UploadedFile, ApiError> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);

    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        bytes.extend_from_slice(&chunk);
        if bytes.len() > MAX_FILE_BYTES {
            return Err(ApiError::BadRequest("file too large (max 10MB)".to_string()));
        }
    }

    Ok(UploadedFile {
        filename,
        content_type,
        bytes,
    })
}

pub async fn get_prescription(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<Prescription>, ApiError> {
    let id = required_id(params.id.as_deref(), "prescription ID")?;
    Ok(Json(prescriptions::get_prescription(&state.pool, id).await?))
}

pub async fn list_with_items(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<Vec<PrescriptionWithItems>>, ApiError> {
    let user_id = required_id(params.user_id.as_deref(), "user ID")?;
    Ok(Json(
        prescriptions::list_user_prescriptions_with_items(&state.pool, user_id).await?,
    ))
}

pub async fn update_seen(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
    Json(update): Json<SeenUpdate>,
) -> Result<Json<Prescription>, ApiError> {
    let id = required_id(params.id.as_deref(), "prescription ID")?;
    let prescription =
        prescriptions::update_seen_by_patient(&state.pool, id, update.seen_by_patient).await?;
    Ok(Json(prescription))
}
