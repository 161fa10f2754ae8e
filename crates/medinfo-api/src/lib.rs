//! medinfo-api
//!
//! HTTP surface of the MedInfo backend: configuration, shared state, error
//! mapping, middleware and routes.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use medinfo_intake::validate::MAX_REQUEST_BYTES;

use state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Bearer token required
    let protected = Router::new()
        .route("/api/users/profile", get(routes::users::profile))
        .route("/api/doctors/profile", get(routes::doctors::profile))
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/auth/check", get(routes::auth::check))
        // Users
        .route("/api/users", get(routes::users::list_users))
        .route("/api/users/create", post(routes::users::create_user))
        .route("/api/users/login", post(routes::users::login_user))
        // Doctors
        .route("/api/doctors", get(routes::doctors::list_doctors))
        .route("/api/doctors/create", post(routes::doctors::create_doctor))
        .route("/api/doctors/get", get(routes::doctors::get_doctor))
        .route("/api/doctors/login", post(routes::doctors::login_doctor))
        .route(
            "/api/doctors/prescriptions-with-items",
            get(routes::doctors::prescriptions_with_items),
        )
        // Prescriptions
        .route(
            "/api/prescriptions",
            get(routes::prescriptions::list_prescriptions),
        )
        .route(
            "/api/prescriptions/create",
            post(routes::prescriptions::create_prescription)
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES)),
        )
        .route(
            "/api/prescriptions/get",
            get(routes::prescriptions::get_prescription),
        )
        .route(
            "/api/prescriptions/with-items",
            get(routes::prescriptions::list_with_items),
        )
        .route(
            "/api/prescriptions/seen/update",
            put(routes::prescriptions::update_seen),
        )
        // Items
        .route("/api/items", get(routes::items::list_items))
        .route("/api/items/create", post(routes::items::create_item))
        .route("/api/items/get", get(routes::items::get_item))
        .route("/api/items/update", put(routes::items::update_doc_reason))
        .merge(protected)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
