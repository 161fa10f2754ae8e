//! Output of the prescription analysis service.
//!
//! The service keys every finding by entity name and usually leaves the
//! embedded `name` field out, so the map key is the authoritative name.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use super::item::{ItemType, NewItem};
use crate::error::CoreError;

/// A recommended diagnostic test with up to three weighted reasons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TestFinding {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason1: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub precision1: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason2: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub precision2: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason3: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub precision3: f64,
}

/// A recommended medicine with up to three weighted descriptions and a price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MedicineFinding {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description1: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub precision1: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description2: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub precision2: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description3: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub precision3: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
}

/// Missing and `null` fields both decode to the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Common access to the embedded name of a finding.
pub trait Finding: Serialize {
    const ITEM_TYPE: ItemType;

    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);
}

impl Finding for TestFinding {
    const ITEM_TYPE: ItemType = ItemType::Test;

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Finding for MedicineFinding {
    const ITEM_TYPE: ItemType = ItemType::Medicine;

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

/// Tests and medicines recommended for one prescription image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tests: BTreeMap<String, TestFinding>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub medicines: BTreeMap<String, MedicineFinding>,
}

impl AnalysisResult {
    /// Overwrite every finding's name with its map key.
    ///
    /// Applying this twice is the same as applying it once.
    pub fn backfill_names(&mut self) {
        backfill(&mut self.tests);
        backfill(&mut self.medicines);
    }

    /// Total number of findings across both maps.
    pub fn finding_count(&self) -> usize {
        self.tests.len() + self.medicines.len()
    }

    /// Materialize one item per finding, tests first.
    ///
    /// The item name is the finding's own name when present, otherwise the
    /// map key. `ai_reasons` is the finding serialized as JSON.
    pub fn to_new_items(&self) -> Result<Vec<NewItem>, CoreError> {
        let mut items = Vec::with_capacity(self.finding_count());
        push_items(&mut items, &self.tests)?;
        push_items(&mut items, &self.medicines)?;
        Ok(items)
    }
}

fn backfill<F: Finding>(findings: &mut BTreeMap<String, F>) {
    for (key, finding) in findings.iter_mut() {
        finding.set_name(key.clone());
    }
}

fn push_items<F: Finding>(
    items: &mut Vec<NewItem>,
    findings: &BTreeMap<String, F>,
) -> Result<(), CoreError> {
    for (key, finding) in findings {
        let name = if finding.name().is_empty() {
            key.clone()
        } else {
            finding.name().to_string()
        };
        items.push(NewItem {
            name,
            item_type: F::ITEM_TYPE,
            ai_reasons: serde_json::to_string(finding)?,
            doc_reason: String::new(),
        });
    }
    Ok(())
}
