use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use medinfo_auth::jwt::{issue_token, Claims};
use medinfo_auth::password::{hash_password, verify_password};
use medinfo_core::models::role::Role;
use medinfo_core::models::user::{NewUser, User};
use medinfo_db::users;

use crate::error::ApiError;
use crate::middleware::auth::require_role;
use crate::routes::blocking;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLogin {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phn_number: String,
    pub token: String,
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(users::list_users(&state.pool).await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    if new_user.email.trim().is_empty() || new_user.password.is_empty() {
        return Err(ApiError::BadRequest("email and password are required".to_string()));
    }

    let password = new_user.password.clone();
    let hash = blocking(move || hash_password(&password)).await?;
    let user = users::create_user(&state.pool, &new_user, &hash).await?;
    tracing::info!(user_id = user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login_user(
    State(state): State<AppState>,
    Json(login): Json<LoginRequest>,
) -> Result<Json<UserLogin>, ApiError> {
    let invalid = || ApiError::Unauthorized("invalid email or password".to_string());

    let (user, hash) = users::find_user_credentials(&state.pool, &login.email)
        .await?
        .ok_or_else(invalid)?;

    let password = login.password;
    if !blocking(move || verify_password(&hash, &password)).await? {
        return Err(invalid());
    }

    let token = issue_token(&state.jwt, user.id, &user.email, Role::User)
        .map_err(|e| ApiError::Internal(format!("failed to generate token: {e}")))?;

    Ok(Json(UserLogin {
        id: user.id,
        name: user.name,
        email: user.email,
        phn_number: user.phn_number,
        token,
    }))
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<User>, ApiError> {
    require_role(&claims, Role::User)?;
    Ok(Json(users::get_user(&state.pool, claims.id).await?))
}
