use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use medinfo_auth::jwt::{verify_token, Claims};
use medinfo_core::models::role::Role;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT validation middleware.
///
/// Verifies the `Authorization: Bearer <token>` header and inserts the
/// token's `Claims` into request extensions for handlers to use.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())?;
    let claims = verify_token(&state.jwt, token)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// The token from a well-formed `Bearer` authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("invalid authorization header format".to_string()))?;

    match header.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() && !token.contains(' ') => Ok(token),
        _ => Err(ApiError::Unauthorized(
            "invalid authorization header format".to_string(),
        )),
    }
}

pub fn require_role(claims: &Claims, role: Role) -> Result<(), ApiError> {
    if claims.role != role {
        return Err(ApiError::Forbidden("forbidden".to_string()));
    }
    Ok(())
}
