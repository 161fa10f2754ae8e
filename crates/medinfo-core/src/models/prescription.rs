use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::item::Item;

/// A submitted prescription image and the symptoms it was submitted with.
///
/// Everything except `seen_by_patient` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Prescription {
    pub id: i64,
    pub created_at: jiff::Timestamp,
    pub symptoms: String,
    pub link: String,
    pub user_id: i64,
    pub doc_id: i64,
    pub seen_by_patient: bool,
}

/// Row data for a prescription about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrescription {
    pub doc_id: i64,
    pub user_id: i64,
    pub symptoms: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PrescriptionWithItems {
    pub prescription: Prescription,
    pub items: Vec<Item>,
}
