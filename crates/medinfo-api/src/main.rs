use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use medinfo_api::config::Config;
use medinfo_api::state::AppState;
use medinfo_auth::jwt::JwtKeys;
use medinfo_intake::Intake;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging, filtered by RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;

    let pool = medinfo_db::pool::connect(&config.database_url).await?;
    medinfo_db::migrate::run_migrations(&pool).await?;

    let storage =
        medinfo_storage::client::build_client(&config.storage_url, &config.storage_service_key)?;
    let analysis = medinfo_analysis::client::build_client(&config.ai_service_url)?;

    let intake = Intake::new(
        Arc::new(storage),
        Arc::new(analysis),
        Arc::new(pool.clone()),
        config.storage_bucket.clone(),
    );

    let state = AppState {
        pool,
        jwt: JwtKeys::from_secret(config.jwt_secret.as_bytes()),
        intake,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, bucket = %config.storage_bucket, "server listening");

    axum::serve(listener, medinfo_api::router(state)).await?;
    Ok(())
}
