use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A doctor who reviews analyzed prescriptions.
///
/// `speciality` is forwarded to the analysis service as a hint. `accuracy`
/// starts at 0.0 for new registrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Doctor {
    pub id: i64,
    pub created_at: jiff::Timestamp,
    pub accuracy: f64,
    pub name: String,
    pub phn_number: String,
    pub speciality: String,
    pub username: String,
    pub email: String,
}

/// Registration payload for a doctor.
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewDoctor {
    pub name: String,
    #[serde(default)]
    pub phn_number: String,
    #[serde(default)]
    pub speciality: String,
    pub username: String,
    pub email: String,
    pub password: String,
}
