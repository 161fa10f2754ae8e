use sqlx::PgPool;

use medinfo_auth::jwt::JwtKeys;
use medinfo_intake::Intake;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub jwt: JwtKeys,
    pub intake: Intake,
}
