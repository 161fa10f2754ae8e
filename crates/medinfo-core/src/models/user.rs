use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A registered patient. The password hash never leaves the database layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub created_at: jiff::Timestamp,
    pub name: String,
    pub phn_number: String,
    pub email: String,
}

/// Registration payload for a patient.
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewUser {
    pub name: String,
    #[serde(default)]
    pub phn_number: String,
    pub email: String,
    pub password: String,
}
