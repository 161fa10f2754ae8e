use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::error::DbError;

const MAX_CONNECTIONS: u32 = 10;

/// Connect and verify the database is reachable.
pub async fn connect(database_url: &str) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await?;
    info!(max_connections = MAX_CONNECTIONS, "database pool ready");
    Ok(pool)
}

/// Build a pool that opens connections on first use.
pub fn connect_lazy(database_url: &str) -> Result<PgPool, DbError> {
    Ok(PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_lazy(database_url)?)
}
