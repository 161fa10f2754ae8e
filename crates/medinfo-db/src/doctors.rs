use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};

use medinfo_core::models::doctor::{Doctor, NewDoctor};

use crate::error::DbError;
use crate::to_timestamp;

const DOCTOR_COLUMNS: &str = "id, created_at, COALESCE(accuracy, 0) AS accuracy, \
     COALESCE(name, '') AS name, COALESCE(phnNumber, '') AS phn_number, \
     COALESCE(speciality, '') AS speciality, COALESCE(username, '') AS username, \
     COALESCE(email, '') AS email";

#[derive(FromRow)]
struct DoctorRow {
    id: i64,
    created_at: NaiveDateTime,
    accuracy: f64,
    name: String,
    phn_number: String,
    speciality: String,
    username: String,
    email: String,
}

impl TryFrom<DoctorRow> for Doctor {
    type Error = DbError;

    fn try_from(row: DoctorRow) -> Result<Self, Self::Error> {
        Ok(Doctor {
            id: row.id,
            created_at: to_timestamp(row.created_at)?,
            accuracy: row.accuracy,
            name: row.name,
            phn_number: row.phn_number,
            speciality: row.speciality,
            username: row.username,
            email: row.email,
        })
    }
}

#[derive(FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    doctor: DoctorRow,
    password_hash: String,
}

/// Insert a doctor with an already-hashed password. Accuracy starts at 0.
pub async fn create_doctor(
    pool: &PgPool,
    new_doctor: &NewDoctor,
    password_hash: &str,
) -> Result<Doctor, DbError> {
    let sql = format!(
        "INSERT INTO doctors (accuracy, name, phnNumber, speciality, username, email, password) \
         VALUES (0.0, $1, $2, $3, $4, $5, $6) RETURNING {DOCTOR_COLUMNS}"
    );
    let row = sqlx::query_as::<_, DoctorRow>(&sql)
        .bind(&new_doctor.name)
        .bind(&new_doctor.phn_number)
        .bind(&new_doctor.speciality)
        .bind(&new_doctor.username)
        .bind(&new_doctor.email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;
    row.try_into()
}

pub async fn get_doctor(pool: &PgPool, id: i64) -> Result<Doctor, DbError> {
    let sql = format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = $1");
    sqlx::query_as::<_, DoctorRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("doctor {id}")))?
        .try_into()
}

/// All doctors, most accurate first.
pub async fn list_doctors(pool: &PgPool) -> Result<Vec<Doctor>, DbError> {
    let sql = format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY accuracy DESC NULLS LAST, id"
    );
    sqlx::query_as::<_, DoctorRow>(&sql)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Doctor::try_from)
        .collect()
}

/// Resolve a doctor by username or email. Username matches win.
pub async fn find_doctor_by_identifier(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<Doctor>, DbError> {
    let sql = format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors WHERE username = $1 OR email = $1 \
         ORDER BY (username = $1) DESC LIMIT 1"
    );
    sqlx::query_as::<_, DoctorRow>(&sql)
        .bind(identifier)
        .fetch_optional(pool)
        .await?
        .map(Doctor::try_from)
        .transpose()
}

/// Look up a doctor and their stored password hash for login.
pub async fn find_doctor_credentials(
    pool: &PgPool,
    email: &str,
) -> Result<Option<(Doctor, String)>, DbError> {
    let sql = format!(
        "SELECT {DOCTOR_COLUMNS}, COALESCE(password, '') AS password_hash \
         FROM doctors WHERE email = $1"
    );
    let Some(row) = sqlx::query_as::<_, CredentialRow>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };
    Ok(Some((row.doctor.try_into()?, row.password_hash)))
}
