// stepform/src/catalog/forms.rs

//! Static step templates of the industrial and straddle-carrier visit forms.

use crate::catalog::definition::Catalog;
use crate::core::step::{FormType, StepDefinition, StepKey};

fn step(
  key: StepKey,
  title: &'static str,
  description: &'static str,
  icon: &'static str,
  color: &'static str,
  fields: &[&'static str],
) -> StepDefinition {
  StepDefinition {
    ordinal: 0,
    title,
    description,
    icon,
    color,
    key,
    fields: fields.to_vec(),
  }
}

fn customer_data() -> StepDefinition {
  step(
    StepKey::CustomerData,
    "Customer data",
    "Company and contact details",
    "building",
    "slate",
    &["customerData.companyName", "customerData.contactName", "customerData.contactEmail"],
  )
}

fn operation() -> StepDefinition {
  step(
    StepKey::Operation,
    "Operation",
    "How and when the equipment works",
    "settings",
    "blue",
    &["operationNotes", "powerType"],
  )
}

fn electrical_equipment() -> StepDefinition {
  step(
    StepKey::ElectricalEquipment,
    "Electrical equipment",
    "Batteries and chargers",
    "battery-charging",
    "amber",
    &[
      "electricalEquipment.noAplica",
      "electricalEquipment.batteryVoltage",
      "electricalEquipment.batteryCapacity",
      "electricalEquipment.chargerType",
      "electricalEquipment.chargingShifts",
    ],
  )
}

fn others() -> StepDefinition {
  step(StepKey::Others, "Others", "Anything else worth noting", "clipboard", "gray", &["otherNotes"])
}

fn files() -> StepDefinition {
  step(StepKey::Files, "Files", "Photos, videos and documents", "paperclip", "violet", &["files"])
}

fn industrial_steps() -> Vec<StepDefinition> {
  vec![
    step(
      StepKey::Application,
      "Application",
      "Product handled by the equipment",
      "package",
      "green",
      &["productDescription"],
    ),
    operation(),
    electrical_equipment(),
    step(
      StepKey::Loads,
      "Loads",
      "Load dimensions and their share of the work",
      "boxes",
      "orange",
      &["loadDimensions"],
    ),
    step(
      StepKey::Aisle,
      "Aisle",
      "Aisle width and lift height",
      "ruler",
      "teal",
      &["aisle.width", "aisle.liftHeight", "aisle.floorType"],
    ),
    others(),
    files(),
  ]
}

fn straddle_carrier_steps() -> Vec<StepDefinition> {
  vec![
    operation(),
    electrical_equipment(),
    step(
      StepKey::Containers,
      "Containers",
      "Container types and throughput",
      "container",
      "cyan",
      &["containerTypes", "containersPerShift"],
    ),
    step(
      StepKey::SpecialLoad,
      "Special load",
      "Out-of-gauge or special cargo",
      "triangle-alert",
      "red",
      &[
        "specialLoad.noAplica",
        "specialLoad.description",
        "specialLoad.weight",
        "specialLoad.dimensions",
      ],
    ),
    step(
      StepKey::Instructions,
      "Instructions",
      "Site instructions for the technician",
      "list-checks",
      "indigo",
      &["instructions"],
    ),
    others(),
    files(),
  ]
}

/// Builds the catalog of `form_type`.
///
/// With `enable_customer_data` the customer-data step is added, either as the
/// first step or, with `customer_data_before_files`, right before the files
/// step. Every ordinal after the insertion point shifts by one.
pub fn get_form_steps(form_type: FormType, enable_customer_data: bool, customer_data_before_files: bool) -> Catalog {
  let steps = match form_type {
    FormType::Industrial => industrial_steps(),
    FormType::StraddleCarrier => straddle_carrier_steps(),
  };
  let mut catalog = Catalog::new(form_type, steps);
  if enable_customer_data {
    if customer_data_before_files {
      catalog.insert_before_step(StepKey::Files, customer_data());
    } else {
      catalog.push_front(customer_data());
    }
  }
  catalog
}
