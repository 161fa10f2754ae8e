//! Idempotent schema setup, safe to run on every start.
//!
//! Column names are unquoted, so Postgres folds them to lower case
//! (`phnNumber` is stored as `phnnumber`). Queries alias them back to
//! snake_case.

use sqlx::PgPool;
use tracing::info;

use crate::error::DbError;

const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        name TEXT,
        phnNumber TEXT,
        email TEXT UNIQUE,
        password TEXT
    )",
    "CREATE TABLE IF NOT EXISTS doctors (
        id BIGSERIAL PRIMARY KEY,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        accuracy FLOAT,
        name TEXT,
        phnNumber TEXT,
        speciality TEXT,
        username TEXT UNIQUE,
        email TEXT UNIQUE,
        password TEXT
    )",
    "CREATE TABLE IF NOT EXISTS prescriptions (
        id BIGSERIAL PRIMARY KEY,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        userId BIGINT,
        docId BIGINT,
        symptoms TEXT,
        link TEXT,
        seenByPatient BOOLEAN DEFAULT FALSE
    )",
    "CREATE TABLE IF NOT EXISTS items (
        id BIGSERIAL PRIMARY KEY,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        presId BIGINT,
        name TEXT,
        type TEXT,
        aiReasons TEXT,
        docReason TEXT
    )",
];

/// Columns added after the first schema revision.
const ADD_COLUMNS: &[&str] = &[
    "ALTER TABLE doctors ADD COLUMN IF NOT EXISTS accuracy FLOAT",
    "ALTER TABLE doctors ADD COLUMN IF NOT EXISTS speciality TEXT",
    "ALTER TABLE doctors ADD COLUMN IF NOT EXISTS username TEXT",
    "ALTER TABLE doctors ADD COLUMN IF NOT EXISTS email TEXT",
    "ALTER TABLE prescriptions ADD COLUMN IF NOT EXISTS userId BIGINT",
    "ALTER TABLE prescriptions ADD COLUMN IF NOT EXISTS docId BIGINT",
    "ALTER TABLE prescriptions ADD COLUMN IF NOT EXISTS symptoms TEXT",
    "ALTER TABLE prescriptions ADD COLUMN IF NOT EXISTS link TEXT",
    "ALTER TABLE prescriptions ADD COLUMN IF NOT EXISTS seenByPatient BOOLEAN DEFAULT FALSE",
    "ALTER TABLE items ADD COLUMN IF NOT EXISTS presId BIGINT",
    "ALTER TABLE items ADD COLUMN IF NOT EXISTS name TEXT",
    "ALTER TABLE items ADD COLUMN IF NOT EXISTS type TEXT",
    "ALTER TABLE items ADD COLUMN IF NOT EXISTS aiReasons TEXT",
    "ALTER TABLE items ADD COLUMN IF NOT EXISTS docReason TEXT",
];

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_prescriptions_userId ON prescriptions(userId)",
    "CREATE INDEX IF NOT EXISTS idx_prescriptions_docId ON prescriptions(docId)",
    "CREATE INDEX IF NOT EXISTS idx_items_presId ON items(presId)",
    "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
    "CREATE INDEX IF NOT EXISTS idx_doctors_email ON doctors(email)",
];

pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    let statements = CREATE_TABLES
        .iter()
        .chain(ADD_COLUMNS)
        .chain(CREATE_INDEXES);

    let mut applied = 0usize;
    for stmt in statements {
        sqlx::query(stmt).execute(pool).await?;
        applied += 1;
    }

    info!(statements = applied, "database migrations complete");
    Ok(())
}
