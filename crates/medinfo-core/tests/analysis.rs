use medinfo_core::models::analysis::{AnalysisResult, MedicineFinding, TestFinding};
use medinfo_core::models::item::ItemType;

fn service_payload() -> AnalysisResult {
    serde_json::from_str(
        r#"{
            "tests": {
                "cbc": {"reason1": "fever", "precision1": 0.91},
                "crp": {"reason1": "inflammation", "precision1": 0.7, "reason2": "fever", "precision2": 0.4}
            },
            "medicines": {
                "paracetamol": {"description1": "antipyretic", "precision1": 0.88, "price": 2.5}
            }
        }"#,
    )
    .unwrap()
}

#[test]
fn missing_name_fields_deserialize_as_empty() {
    let result = service_payload();
    assert_eq!(result.tests["cbc"].name, "");
    assert_eq!(result.medicines["paracetamol"].name, "");
    assert_eq!(result.medicines["paracetamol"].price, 2.5);
}

#[test]
fn missing_maps_default_to_empty() {
    let result: AnalysisResult = serde_json::from_str(r#"{"tests": {}}"#).unwrap();
    assert!(result.medicines.is_empty());
    assert_eq!(result.finding_count(), 0);
}

#[test]
fn backfill_copies_keys_into_names() {
    let mut result = service_payload();
    result.backfill_names();
    assert_eq!(result.tests["cbc"].name, "cbc");
    assert_eq!(result.tests["crp"].name, "crp");
    assert_eq!(result.medicines["paracetamol"].name, "paracetamol");
}

#[test]
fn backfill_is_idempotent() {
    let mut once = service_payload();
    once.backfill_names();
    let mut twice = once.clone();
    twice.backfill_names();
    assert_eq!(once, twice);
}

#[test]
fn one_item_per_finding_with_matching_type() {
    let result = service_payload();
    let items = result.to_new_items().unwrap();

    assert_eq!(items.len(), result.finding_count());
    let tests: Vec<_> = items.iter().filter(|i| i.item_type == ItemType::Test).collect();
    let meds: Vec<_> = items.iter().filter(|i| i.item_type == ItemType::Medicine).collect();
    assert_eq!(tests.len(), 2);
    assert_eq!(meds.len(), 1);
    assert!(items.iter().all(|i| i.doc_reason.is_empty()));
}

#[test]
fn item_name_falls_back_to_key() {
    let result = service_payload();
    let items = result.to_new_items().unwrap();
    let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["cbc", "crp", "paracetamol"]);
}

#[test]
fn item_name_prefers_embedded_name() {
    let mut result = AnalysisResult::default();
    result.tests.insert(
        "cbc".to_string(),
        TestFinding {
            name: "Complete blood count".to_string(),
            ..Default::default()
        },
    );
    let items = result.to_new_items().unwrap();
    assert_eq!(items[0].name, "Complete blood count");
}

#[test]
fn ai_reasons_is_the_serialized_finding() {
    let mut result = AnalysisResult::default();
    result.medicines.insert(
        "ibuprofen".to_string(),
        MedicineFinding {
            name: "ibuprofen".to_string(),
            description1: "pain".to_string(),
            precision1: 0.5,
            price: 4.0,
            ..Default::default()
        },
    );
    let items = result.to_new_items().unwrap();
    let decoded: MedicineFinding = serde_json::from_str(&items[0].ai_reasons).unwrap();
    assert_eq!(decoded, result.medicines["ibuprofen"]);
}

#[test]
fn null_fields_and_maps_decode_as_empty() {
    let mut result: AnalysisResult = serde_json::from_str(
        r#"{
            "tests": {
                "cbc": {"name": null, "reason1": "x", "precision1": 0.9, "reason2": null, "precision2": null}
            },
            "medicines": null
        }"#,
    )
    .unwrap();

    let cbc = &result.tests["cbc"];
    assert_eq!(cbc.reason1, "x");
    assert_eq!(cbc.reason2, "");
    assert_eq!(cbc.precision2, 0.0);
    assert!(result.medicines.is_empty());

    result.backfill_names();
    assert_eq!(result.tests["cbc"].name, "cbc");
    assert_eq!(result.to_new_items().unwrap().len(), 1);
}

#[test]
fn null_tests_map_decodes_as_empty() {
    let result: AnalysisResult =
        serde_json::from_str(r#"{"tests": null, "medicines": {"ors": {"price": null}}}"#).unwrap();
    assert!(result.tests.is_empty());
    assert_eq!(result.medicines["ors"].price, 0.0);
}
