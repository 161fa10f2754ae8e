use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;

use medinfo_auth::jwt::{issue_token, Claims};
use medinfo_auth::password::{hash_password, verify_password};
use medinfo_core::models::doctor::{Doctor, NewDoctor};
use medinfo_core::models::prescription::PrescriptionWithItems;
use medinfo_core::models::role::Role;
use medinfo_db::{doctors, prescriptions};

use crate::error::ApiError;
use crate::middleware::auth::require_role;
use crate::routes::users::LoginRequest;
use crate::routes::{blocking, required_id, IdParams};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DoctorLogin {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
    pub speciality: String,
    pub accuracy: f64,
    pub token: String,
}

pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<Vec<Doctor>>, ApiError> {
    Ok(Json(doctors::list_doctors(&state.pool).await?))
}

pub async fn create_doctor(
    State(state): State<AppState>,
    Json(new_doctor): Json<NewDoctor>,
) -> Result<(StatusCode, Json<Doctor>), ApiError> {
    if new_doctor.email.trim().is_empty()
        || new_doctor.username.trim().is_empty()
        || new_doctor.password.is_empty()
    {
        return Err(ApiError::BadRequest(
            "username, email and password are required".to_string(),
        ));
    }

    let password = new_doctor.password.clone();
    let hash = blocking(move || hash_password(&password)).await?;
    let doctor = doctors::create_doctor(&state.pool, &new_doctor, &hash).await?;
    tracing::info!(doctor_id = doctor.id, "doctor registered");
    Ok((StatusCode::CREATED, Json(doctor)))
}

pub async fn get_doctor(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<Doctor>, ApiError> {
    let id = required_id(params.id.as_deref(), "doctor ID")?;
    Ok(Json(doctors::get_doctor(&state.pool, id).await?))
}

pub async fn login_doctor(
    State(state): State<AppState>,
    Json(login): Json<LoginRequest>,
) -> Result<Json<DoctorLogin>, ApiError> {
    let invalid = || ApiError::Unauthorized("invalid email or password".to_string());

    let (doctor, hash) = doctors::find_doctor_credentials(&state.pool, &login.email)
        .await?
        .ok_or_else(invalid)?;

    let password = login.password;
    if !blocking(move || verify_password(&hash, &password)).await? {
        return Err(invalid());
    }

    let token = issue_token(&state.jwt, doctor.id, &doctor.email, Role::Doctor)
        .map_err(|e| ApiError::Internal(format!("failed to generate token: {e}")))?;

    Ok(Json(DoctorLogin {
        id: doctor.id,
        name: doctor.name,
        email: doctor.email,
        username: doctor.username,
        speciality: doctor.speciality,
        accuracy: doctor.accuracy,
        token,
    }))
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Doctor>, ApiError> {
    require_role(&claims, Role::Doctor)?;
    Ok(Json(doctors::get_doctor(&state.pool, claims.id).await?))
}

pub async fn prescriptions_with_items(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<Vec<PrescriptionWithItems>>, ApiError> {
    let doc_id = required_id(params.doctor_id.as_deref(), "doctor ID")?;
    Ok(Json(
        prescriptions::list_doctor_prescriptions_with_items(&state.pool, doc_id).await?,
    ))
}
