use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};

use medinfo_core::models::user::{NewUser, User};

use crate::error::DbError;
use crate::to_timestamp;

const USER_COLUMNS: &str = "id, created_at, COALESCE(name, '') AS name, \
     COALESCE(phnNumber, '') AS phn_number, COALESCE(email, '') AS email";

#[derive(FromRow)]
struct UserRow {
    id: i64,
    created_at: NaiveDateTime,
    name: String,
    phn_number: String,
    email: String,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            created_at: to_timestamp(row.created_at)?,
            name: row.name,
            phn_number: row.phn_number,
            email: row.email,
        })
    }
}

#[derive(FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// Insert a user with an already-hashed password.
pub async fn create_user(
    pool: &PgPool,
    new_user: &NewUser,
    password_hash: &str,
) -> Result<User, DbError> {
    let sql = format!(
        "INSERT INTO users (name, phnNumber, email, password) VALUES ($1, $2, $3, $4) \
         RETURNING {USER_COLUMNS}"
    );
    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(&new_user.name)
        .bind(&new_user.phn_number)
        .bind(&new_user.email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;
    row.try_into()
}

pub async fn get_user(pool: &PgPool, id: i64) -> Result<User, DbError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, UserRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("user {id}")))?
        .try_into()
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, DbError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
    sqlx::query_as::<_, UserRow>(&sql)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(User::try_from)
        .collect()
}

/// Look up a user and their stored password hash for login.
pub async fn find_user_credentials(
    pool: &PgPool,
    email: &str,
) -> Result<Option<(User, String)>, DbError> {
    let sql = format!(
        "SELECT {USER_COLUMNS}, COALESCE(password, '') AS password_hash \
         FROM users WHERE email = $1"
    );
    let Some(row) = sqlx::query_as::<_, CredentialRow>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };
    Ok(Some((row.user.try_into()?, row.password_hash)))
}
