// tests/tracker_tests.rs
mod common;

use common::*;
use serde_json::json;
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;
use stepform::validation::field_rules_for;
use stepform::{
  evaluate, get_form_steps, Catalog, CompletionTracker, FormState, FormType, FormValues, StepDefinition, StepKey,
};

const WINDOW: Duration = Duration::from_millis(150);

fn industrial_tracker(initial: FormValues) -> (FormState, CompletionTracker) {
  let catalog = Arc::new(get_form_steps(FormType::Industrial, false, false));
  let form = FormState::new(initial, field_rules_for(FormType::Industrial));
  let tracker = CompletionTracker::spawn(form.clone(), catalog, WINDOW);
  (form, tracker)
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_initial_set_is_computed_at_spawn() {
  setup_tracing();
  let (_form, tracker) = industrial_tracker(complete_industrial_values());
  let completed = tracker.completed();
  assert!(completed.contains(1));
  assert!(completed.contains(2));
  assert!(completed.contains(4));
  assert!(!completed.contains(3)); // Not electric: skipped, never completed.
  assert_eq!(tracker.recomputations(), 0);
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_rapid_edits_collapse_into_one_recomputation() {
  setup_tracing();
  let (form, tracker) = industrial_tracker(FormValues::new());

  for i in 0..5 {
    form.set_value("operationNotes", json!(format!("Shift plan {}", i)));
    tokio::time::sleep(Duration::from_millis(50)).await;
  }
  form.set_value("powerType", json!("DIESEL"));

  // Still inside the window opened by the last edit.
  assert!(tracker.completed().is_empty());
  assert_eq!(tracker.recomputations(), 0);

  tokio::time::sleep(WINDOW + Duration::from_millis(50)).await;
  assert_eq!(tracker.recomputations(), 1);
  let operation = tracker.catalog().ordinal_of(StepKey::Operation).unwrap();
  assert!(tracker.completed().contains(operation));
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_last_write_wins() {
  setup_tracing();
  let (form, tracker) = industrial_tracker(FormValues::new());

  form.set_value("productDescription", json!("Palletised beverages"));
  tokio::time::sleep(Duration::from_millis(40)).await;
  form.set_value("productDescription", json!("short"));

  tokio::time::sleep(WINDOW * 2).await;
  assert!(!tracker.completed().contains(1));
  assert_eq!(tracker.recomputations(), 1);
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_unchanged_membership_is_not_republished() {
  setup_tracing();
  let (form, tracker) = industrial_tracker(complete_industrial_values());
  let mut updates = tracker.subscribe();
  updates.borrow_and_update();

  form.set_value("operationNotes", json!("Three shifts now"));
  tokio::time::sleep(WINDOW * 2).await;

  assert_eq!(tracker.recomputations(), 1);
  assert!(!updates.has_changed().unwrap());

  form.set_value("operationNotes", json!("   "));
  updates.changed().await.unwrap();
  assert!(!updates.borrow().contains(2));
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_totals_never_lag_behind_values() {
  setup_tracing();
  let (form, tracker) = industrial_tracker(complete_industrial_values());
  assert!(tracker.all_required_complete());

  form.set_value("loadDimensions", json!([{ "description": "Euro pallet", "percentage": 99.99 }]));
  // No time has passed: the published set is stale, the totals are not.
  assert!(tracker.completed().contains(4));
  assert!(!tracker.all_required_complete());
  assert_eq!(tracker.progress(), 67);
}

#[test]
#[serial]
fn test_progress_counts_only_applicable_required_steps() {
  setup_tracing();
  let catalog = get_form_steps(FormType::Industrial, false, false);
  let partial = values(json!({
    "productDescription": "Palletised beverages",
    "operationNotes": "Two shifts",
    "powerType": "DIESEL",
  }));
  let completion = evaluate(&catalog, &partial);
  // application, operation and loads are required; electrical is skipped.
  assert_eq!(completion.required, 3);
  assert_eq!(completion.completed_required, 2);
  assert_eq!(completion.progress, 67);
  assert!(!completion.all_required_complete);
  assert!(completion.skipped.contains(&catalog.ordinal_of(StepKey::ElectricalEquipment).unwrap()));
}

#[test]
#[serial]
fn test_catalog_without_required_steps_is_fully_complete() {
  setup_tracing();
  let optional_only = Catalog::new(
    FormType::Industrial,
    vec![StepDefinition {
      ordinal: 0,
      title: "others",
      description: "",
      icon: "",
      color: "",
      key: StepKey::Others,
      fields: Vec::new(),
    }],
  );
  let completion = evaluate(&optional_only, &FormValues::new());
  assert_eq!(completion.required, 0);
  assert_eq!(completion.progress, 100);
  assert!(completion.all_required_complete);
}
