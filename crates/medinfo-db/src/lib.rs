//! medinfo-db
//!
//! PostgreSQL persistence for users, doctors, prescriptions and items.
//! Every operation takes a `PgPool`; the pool is what makes the gateway safe
//! to share across concurrent requests.

pub mod doctors;
pub mod error;
pub mod items;
pub mod migrate;
pub mod pool;
pub mod prescriptions;
pub mod users;

use chrono::NaiveDateTime;

use crate::error::DbError;

/// `created_at` columns are `TIMESTAMP` without zone, written as UTC.
pub(crate) fn to_timestamp(value: NaiveDateTime) -> Result<jiff::Timestamp, DbError> {
    jiff::Timestamp::from_microsecond(value.and_utc().timestamp_micros())
        .map_err(|e| DbError::Decode(format!("created_at out of range: {e}")))
}
