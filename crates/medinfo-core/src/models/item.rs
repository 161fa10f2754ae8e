use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// The two kinds of recommendation a prescription can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ItemType {
    #[serde(rename = "med", alias = "medicine")]
    Medicine,
    #[serde(rename = "test")]
    Test,
}

impl ItemType {
    /// The tag stored in the `items.type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Medicine => "med",
            ItemType::Test => "test",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "med" | "medicine" => Ok(ItemType::Medicine),
            "test" => Ok(ItemType::Test),
            other => Err(CoreError::InvalidItemType(other.to_string())),
        }
    }
}

/// A medicine or test attached to a prescription.
///
/// `ai_reasons` holds the serialized finding the item was derived from.
/// `doc_reason` starts empty and is the only field edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Item {
    pub id: i64,
    pub created_at: jiff::Timestamp,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub ai_reasons: String,
    pub doc_reason: String,
    pub pres_id: i64,
}

/// Row data for an item about to be inserted under a known prescription.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub item_type: ItemType,
    pub ai_reasons: String,
    pub doc_reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_round_trips_through_column_tag() {
        for t in [ItemType::Medicine, ItemType::Test] {
            assert_eq!(t.as_str().parse::<ItemType>().unwrap(), t);
        }
    }

    #[test]
    fn medicine_serializes_as_med() {
        assert_eq!(serde_json::to_string(&ItemType::Medicine).unwrap(), "\"med\"");
        let parsed: ItemType = serde_json::from_str("\"medicine\"").unwrap();
        assert_eq!(parsed, ItemType::Medicine);
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!("surgery".parse::<ItemType>().is_err());
    }
}
