// tests/validation_tests.rs
mod common;

use common::*;
use serde_json::{json, Value};
use serial_test::serial;
use stepform::validation::{field_rules_for, FieldRule};
use stepform::{is_step_applicable, is_step_complete, is_step_complete_by_name, FormType, FormValues, StepKey};

fn rows(percentages: &[f64]) -> FormValues {
  let rows: Vec<Value> = percentages
    .iter()
    .map(|p| json!({ "description": "Pallet", "percentage": p }))
    .collect();
  values(json!({ "loadDimensions": rows }))
}

fn loads_complete(percentages: &[f64]) -> bool {
  is_step_complete(StepKey::Loads, &rows(percentages))
}

fn rows_rule_passes(percentages: &[f64]) -> bool {
  FieldRule::PercentageRows.check("loadDimensions", &rows(percentages)).is_none()
}

// --- Percentage closure ---

#[test]
#[serial]
fn test_single_row_boundaries() {
  setup_tracing();
  assert!(loads_complete(&[100.0]));
  assert!(loads_complete(&[100.005]));
  assert!(!loads_complete(&[99.99]));
  assert!(!loads_complete(&[100.01]));
  assert!(!loads_complete(&[100.02]));
  assert!(!loads_complete(&[]));
}

#[test]
#[serial]
fn test_multi_row_sums_do_not_drift_into_tolerance() {
  setup_tracing();
  let cases: [(&[f64], bool); 7] = [
    (&[30.0, 30.0, 40.0], true),
    (&[33.33, 33.33, 33.34], true),
    (&[10.1, 20.2, 69.7], true),
    (&[50.0, 50.005], true),
    (&[50.0, 49.99], false),
    (&[30.0, 30.0, 39.99], false),
    (&[60.0, 40.01], false),
  ];
  for (percentages, expected) in cases {
    assert_eq!(loads_complete(percentages), expected, "step rule for {:?}", percentages);
    assert_eq!(rows_rule_passes(percentages), expected, "field rule for {:?}", percentages);
  }
}

#[test]
#[serial]
fn test_load_rows_need_descriptions_and_numbers() {
  setup_tracing();
  let missing_description = values(json!({
    "loadDimensions": [{ "description": " ", "percentage": 100 }]
  }));
  assert!(!is_step_complete(StepKey::Loads, &missing_description));

  let string_percentages = values(json!({
    "loadDimensions": [
      { "description": "Coils", "percentage": "60" },
      { "description": "Boxes", "percentage": "40" }
    ]
  }));
  assert!(is_step_complete(StepKey::Loads, &string_percentages));

  let missing_percentage = values(json!({ "loadDimensions": [{ "description": "Coils" }] }));
  assert!(!is_step_complete(StepKey::Loads, &missing_percentage));
}

// --- Step rules ---

#[test]
#[serial]
fn test_product_description_needs_ten_trimmed_chars() {
  setup_tracing();
  let short = values(json!({ "productDescription": "   123456789   " }));
  let long = values(json!({ "productDescription": "1234567890" }));
  assert!(!is_step_complete(StepKey::Application, &short));
  assert!(is_step_complete(StepKey::Application, &long));
}

#[test]
#[serial]
fn test_electrical_group_accepts_flag_or_any_data() {
  setup_tracing();
  let flagged = values(json!({
    "powerType": "ELECTRIC",
    "electricalEquipment": { "noAplica": true, "batteryVoltage": null, "chargerType": null }
  }));
  assert!(is_step_applicable(StepKey::ElectricalEquipment, &flagged));
  assert!(is_step_complete(StepKey::ElectricalEquipment, &flagged));

  let empty = values(json!({
    "powerType": "ELECTRIC",
    "electricalEquipment": { "noAplica": false, "batteryVoltage": null }
  }));
  assert!(!is_step_complete(StepKey::ElectricalEquipment, &empty));

  let diesel = values(json!({ "powerType": "DIESEL" }));
  assert!(!is_step_applicable(StepKey::ElectricalEquipment, &diesel));
}

#[test]
#[serial]
fn test_customer_data_requires_a_plausible_email() {
  setup_tracing();
  let mut customer = values(json!({
    "customerData": { "companyName": "Acme", "contactName": "R. Vidal", "contactEmail": "rvidal" }
  }));
  assert!(!is_step_complete(StepKey::CustomerData, &customer));
  customer.set("customerData.contactEmail", json!("rvidal@acme.test"));
  assert!(is_step_complete(StepKey::CustomerData, &customer));
}

#[test]
#[serial]
fn test_containers_need_types_and_positive_throughput() {
  setup_tracing();
  let mut containers = values(json!({ "containerTypes": ["20FT"], "containersPerShift": 0 }));
  assert!(!is_step_complete(StepKey::Containers, &containers));
  containers.set("containersPerShift", json!("35"));
  assert!(is_step_complete(StepKey::Containers, &containers));
}

#[test]
#[serial]
fn test_known_names_resolve_to_step_rules() {
  setup_tracing();
  let notes = values(json!({ "instructions": "Check the crane rails" }));
  assert!(is_step_complete_by_name("instructions", &notes));
  assert!(!is_step_complete_by_name("containers", &notes));
}

#[test]
#[serial]
#[cfg_attr(debug_assertions, should_panic(expected = "unrecognized step key 'batteries'"))]
fn test_unknown_name_is_a_defect_and_fails_closed() {
  setup_tracing();
  let notes = values(json!({ "instructions": "Check the crane rails" }));
  assert!(!is_step_complete_by_name("batteries", &notes));
}

// --- Field rules ---

#[test]
#[serial]
fn test_first_failing_field_rule_wins() {
  setup_tracing();
  let rules = field_rules_for(FormType::Industrial);
  assert_eq!(
    rules.check("productDescription", &FormValues::new()).as_deref(),
    Some("productDescription is required")
  );
  let short = values(json!({ "productDescription": "short" }));
  assert_eq!(
    rules.check("productDescription", &short).as_deref(),
    Some("productDescription needs at least 10 characters")
  );
}

#[test]
#[serial]
fn test_required_accepts_non_text_values() {
  setup_tracing();
  let mixed = values(json!({ "a": 0, "b": null, "c": "  " }));
  assert!(FieldRule::Required.check("a", &mixed).is_none());
  assert!(FieldRule::Required.check("b", &mixed).is_some());
  assert!(FieldRule::Required.check("c", &mixed).is_some());
}

#[test]
#[serial]
fn test_straddle_rules_do_not_include_industrial_fields() {
  setup_tracing();
  let rules = field_rules_for(FormType::StraddleCarrier);
  assert!(rules.has_rules_for("instructions"));
  assert!(!rules.has_rules_for("loadDimensions"));
  assert!(rules.check("loadDimensions", &FormValues::new()).is_none());
}
