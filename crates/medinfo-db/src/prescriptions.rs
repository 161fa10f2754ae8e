use std::collections::HashMap;

use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};

use medinfo_core::models::prescription::{NewPrescription, Prescription, PrescriptionWithItems};

use crate::error::DbError;
use crate::items::list_items_for_prescriptions;
use crate::to_timestamp;

const PRESCRIPTION_COLUMNS: &str = "id, created_at, COALESCE(symptoms, '') AS symptoms, \
     COALESCE(link, '') AS link, COALESCE(userId, 0) AS user_id, \
     COALESCE(docId, 0) AS doc_id, COALESCE(seenByPatient, FALSE) AS seen_by_patient";

#[derive(FromRow)]
struct PrescriptionRow {
    id: i64,
    created_at: NaiveDateTime,
    symptoms: String,
    link: String,
    user_id: i64,
    doc_id: i64,
    seen_by_patient: bool,
}

impl TryFrom<PrescriptionRow> for Prescription {
    type Error = DbError;

    fn try_from(row: PrescriptionRow) -> Result<Self, Self::Error> {
        Ok(Prescription {
            id: row.id,
            created_at: to_timestamp(row.created_at)?,
            symptoms: row.symptoms,
            link: row.link,
            user_id: row.user_id,
            doc_id: row.doc_id,
            seen_by_patient: row.seen_by_patient,
        })
    }
}

/// Insert a prescription row. New prescriptions start unseen.
pub async fn insert_prescription(
    pool: &PgPool,
    new: &NewPrescription,
) -> Result<Prescription, DbError> {
    let sql = format!(
        "INSERT INTO prescriptions (docId, userId, symptoms, link, seenByPatient) \
         VALUES ($1, $2, $3, $4, FALSE) RETURNING {PRESCRIPTION_COLUMNS}"
    );
    sqlx::query_as::<_, PrescriptionRow>(&sql)
        .bind(new.doc_id)
        .bind(new.user_id)
        .bind(&new.symptoms)
        .bind(&new.link)
        .fetch_one(pool)
        .await?
        .try_into()
}

pub async fn get_prescription(pool: &PgPool, id: i64) -> Result<Prescription, DbError> {
    let sql = format!("SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE id = $1");
    sqlx::query_as::<_, PrescriptionRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("prescription {id}")))?
        .try_into()
}

/// A patient's prescriptions, newest first.
pub async fn list_user_prescriptions(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<Prescription>, DbError> {
    let sql = format!(
        "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE userId = $1 \
         ORDER BY created_at DESC, id DESC"
    );
    fetch_list(pool, &sql, user_id).await
}

/// Prescriptions routed to a doctor, newest first.
pub async fn list_doctor_prescriptions(
    pool: &PgPool,
    doc_id: i64,
) -> Result<Vec<Prescription>, DbError> {
    let sql = format!(
        "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE docId = $1 \
         ORDER BY created_at DESC, id DESC"
    );
    fetch_list(pool, &sql, doc_id).await
}

async fn fetch_list(pool: &PgPool, sql: &str, id: i64) -> Result<Vec<Prescription>, DbError> {
    sqlx::query_as::<_, PrescriptionRow>(sql)
        .bind(id)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Prescription::try_from)
        .collect()
}

/// Set the patient-seen flag, the only mutable prescription field.
pub async fn update_seen_by_patient(
    pool: &PgPool,
    id: i64,
    seen: bool,
) -> Result<Prescription, DbError> {
    let sql = format!(
        "UPDATE prescriptions SET seenByPatient = $2 WHERE id = $1 \
         RETURNING {PRESCRIPTION_COLUMNS}"
    );
    sqlx::query_as::<_, PrescriptionRow>(&sql)
        .bind(id)
        .bind(seen)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("prescription {id}")))?
        .try_into()
}

/// A patient's prescriptions with their items, newest first.
pub async fn list_user_prescriptions_with_items(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<PrescriptionWithItems>, DbError> {
    let prescriptions = list_user_prescriptions(pool, user_id).await?;
    attach_items(pool, prescriptions).await
}

/// A doctor's prescriptions with their items, newest first.
pub async fn list_doctor_prescriptions_with_items(
    pool: &PgPool,
    doc_id: i64,
) -> Result<Vec<PrescriptionWithItems>, DbError> {
    let prescriptions = list_doctor_prescriptions(pool, doc_id).await?;
    attach_items(pool, prescriptions).await
}

/// One extra query for all items, grouped back onto their prescriptions.
async fn attach_items(
    pool: &PgPool,
    prescriptions: Vec<Prescription>,
) -> Result<Vec<PrescriptionWithItems>, DbError> {
    if prescriptions.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = prescriptions.iter().map(|p| p.id).collect();
    let mut by_prescription: HashMap<i64, Vec<_>> = HashMap::new();
    for item in list_items_for_prescriptions(pool, &ids).await? {
        by_prescription.entry(item.pres_id).or_default().push(item);
    }

    Ok(prescriptions
        .into_iter()
        .map(|prescription| {
            let items = by_prescription.remove(&prescription.id).unwrap_or_default();
            PrescriptionWithItems {
                prescription,
                items,
            }
        })
        .collect())
}
