// stepform/src/validation/rules.rs

//! Step-level completion rules, one arm per `StepKey`.
//!
//! Both `is_step_complete` and `is_step_applicable` are exhaustive matches with
//! no wildcard arm: adding a key to `StepKey` does not compile until each
//! of them has a rule for it.

use crate::core::step::StepKey;
use crate::core::values::{number_of, FormValues, NOT_APPLICABLE_FLAG};
use serde_json::Value;
use tracing::{event, Level};

/// Discriminator value that makes the electrical-equipment step applicable.
pub const ELECTRIC: &str = "ELECTRIC";

pub const MIN_PRODUCT_DESCRIPTION_CHARS: usize = 10;

/// Allocation rows must sum to this total, within `PERCENTAGE_TOLERANCE` (exclusive).
pub const PERCENTAGE_TOTAL: f64 = 100.0;
pub const PERCENTAGE_TOLERANCE: f64 = 0.01;
const MICROS: f64 = 1_000_000.0;

pub fn is_step_complete(key: StepKey, values: &FormValues) -> bool {
  match key {
    StepKey::CustomerData => {
      values.text("customerData.companyName").is_some()
        && values.text("customerData.contactName").is_some()
        && values.text("customerData.contactEmail").is_some_and(is_email)
    }
    StepKey::Application => values
      .text("productDescription")
      .is_some_and(|text| text.chars().count() >= MIN_PRODUCT_DESCRIPTION_CHARS),
    StepKey::Operation => values.text("operationNotes").is_some() && values.text("powerType").is_some(),
    StepKey::ElectricalEquipment => group_has_data_or_not_applicable(values, "electricalEquipment"),
    StepKey::Loads => percentage_rows_complete(values.list("loadDimensions")),
    StepKey::Aisle => values.group_has_data("aisle"),
    StepKey::Containers => {
      !values.list("containerTypes").is_empty() && values.number("containersPerShift").is_some_and(|n| n > 0.0)
    }
    StepKey::SpecialLoad => group_has_data_or_not_applicable(values, "specialLoad"),
    StepKey::Instructions => values.text("instructions").is_some(),
    StepKey::Others => values.text("otherNotes").is_some(),
    StepKey::Files => !values.list("files").is_empty(),
  }
}

/// Whether the step is relevant for the current values. Inapplicable steps are
/// skipped by navigation and excluded from every completion count.
pub fn is_step_applicable(key: StepKey, values: &FormValues) -> bool {
  match key {
    StepKey::ElectricalEquipment => is_electric(values),
    StepKey::CustomerData
    | StepKey::Application
    | StepKey::Operation
    | StepKey::Loads
    | StepKey::Aisle
    | StepKey::Containers
    | StepKey::SpecialLoad
    | StepKey::Instructions
    | StepKey::Others
    | StepKey::Files => true,
  }
}

/// Name-based entry point for hosts that carry step keys as strings.
/// An unrecognized name is a caller defect: it asserts in debug builds and
/// fails closed in release.
pub fn is_step_complete_by_name(name: &str, values: &FormValues) -> bool {
  let parsed = name.parse::<StepKey>();
  debug_assert!(parsed.is_ok(), "Validator asked about unrecognized step key '{}'", name);
  match parsed {
    Ok(key) => is_step_complete(key, values),
    Err(err) => {
      event!(Level::ERROR, error = %err, "Validator asked about an unrecognized step key.");
      false
    }
  }
}

pub fn is_electric(values: &FormValues) -> bool {
  values.text("powerType") == Some(ELECTRIC)
}

/// Rule for groups of nominally optional detail: complete once any member
/// has data, or when the user explicitly ticked "not applicable".
pub fn group_has_data_or_not_applicable(values: &FormValues, group: &str) -> bool {
  values.flag(&format!("{group}.{NOT_APPLICABLE_FLAG}")) || values.group_has_data(group)
}

/// At least one row; every row has a description and a numeric percentage;
/// the percentages close to 100.
pub fn percentage_rows_complete(rows: &[Value]) -> bool {
  if rows.is_empty() {
    return false;
  }
  let mut total = 0.0;
  for row in rows {
    let described = row
      .get("description")
      .and_then(Value::as_str)
      .is_some_and(|description| !description.trim().is_empty());
    let percentage = row.get("percentage").and_then(number_of);
    match (described, percentage) {
      (true, Some(percentage)) => total += percentage,
      _ => return false,
    }
  }
  // Compared in millionths; float row sums drift (50 + 49.99 = 99.99000000000001).
  let deviation = ((total - PERCENTAGE_TOTAL).abs() * MICROS).round();
  deviation < (PERCENTAGE_TOLERANCE * MICROS).round()
}

pub fn is_email(text: &str) -> bool {
  match text.split_once('@') {
    Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
    None => false,
  }
}
