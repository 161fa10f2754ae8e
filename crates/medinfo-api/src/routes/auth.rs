use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use medinfo_auth::jwt::verify_token;
use medinfo_core::models::role::Role;
use medinfo_db::error::DbError;
use medinfo_db::{doctors, users};

use crate::error::ApiError;
use crate::middleware::auth::bearer_token;
use crate::state::AppState;

#[derive(Serialize)]
struct Authenticated<T> {
    authenticated: bool,
    role: Role,
    #[serde(flatten)]
    profile: T,
}

/// Report whether the caller's token is valid, and whose it is.
///
/// Never fails with an auth error: a missing or bad token is a normal
/// `authenticated: false` answer.
pub async fn check(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let verified =
        bearer_token(&headers).and_then(|t| verify_token(&state.jwt, t).map_err(ApiError::from));
    let claims = match verified {
        Ok(claims) => claims,
        Err(_) => return Ok(unauthenticated("no valid token, please login or register")),
    };

    let response = match claims.role {
        Role::User => match users::get_user(&state.pool, claims.id).await {
            Ok(user) => authenticated(Role::User, user),
            Err(DbError::NotFound(_)) => unauthenticated("user not found"),
            Err(e) => return Err(e.into()),
        },
        Role::Doctor => match doctors::get_doctor(&state.pool, claims.id).await {
            Ok(doctor) => authenticated(Role::Doctor, doctor),
            Err(DbError::NotFound(_)) => unauthenticated("doctor not found"),
            Err(e) => return Err(e.into()),
        },
    };
    Ok(response)
}

fn authenticated<T: Serialize>(role: Role, profile: T) -> Response {
    Json(Authenticated {
        authenticated: true,
        role,
        profile,
    })
    .into_response()
}

fn unauthenticated(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "authenticated": false, "message": message })),
    )
        .into_response()
}
