// stepform/src/core/step.rs

//! Defines the structure for a single step within a wizard catalog.

use crate::error::WizardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which visit form a wizard drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormType {
  Industrial,
  StraddleCarrier,
}

impl FormType {
  pub fn as_str(&self) -> &'static str {
    match self {
      FormType::Industrial => "INDUSTRIAL",
      FormType::StraddleCarrier => "STRADDLE_CARRIER",
    }
  }
}

/// Semantic identity of a step. Validation dispatches on this, never on the ordinal,
/// because ordinals shift when the customer-data step is toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKey {
  CustomerData,
  Application,
  Operation,
  ElectricalEquipment,
  Loads,
  Aisle,
  Containers,
  SpecialLoad,
  Instructions,
  Others,
  Files,
}

impl StepKey {
  pub const ALL: [StepKey; 11] = [
    StepKey::CustomerData,
    StepKey::Application,
    StepKey::Operation,
    StepKey::ElectricalEquipment,
    StepKey::Loads,
    StepKey::Aisle,
    StepKey::Containers,
    StepKey::SpecialLoad,
    StepKey::Instructions,
    StepKey::Others,
    StepKey::Files,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      StepKey::CustomerData => "customerData",
      StepKey::Application => "application",
      StepKey::Operation => "operation",
      StepKey::ElectricalEquipment => "electricalEquipment",
      StepKey::Loads => "loads",
      StepKey::Aisle => "aisle",
      StepKey::Containers => "containers",
      StepKey::SpecialLoad => "specialLoad",
      StepKey::Instructions => "instructions",
      StepKey::Others => "others",
      StepKey::Files => "files",
    }
  }

  /// Optional steps are always applicable but never block completion
  /// and never count towards the required total.
  pub fn is_optional(&self) -> bool {
    match self {
      StepKey::Aisle | StepKey::Others | StepKey::Files => true,
      StepKey::CustomerData
      | StepKey::Application
      | StepKey::Operation
      | StepKey::ElectricalEquipment
      | StepKey::Loads
      | StepKey::Containers
      | StepKey::SpecialLoad
      | StepKey::Instructions => false,
    }
  }
}

impl fmt::Display for StepKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for StepKey {
  type Err = WizardError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    StepKey::ALL
      .iter()
      .copied()
      .find(|key| key.as_str() == s)
      .ok_or_else(|| WizardError::UnknownStep { name: s.to_string() })
  }
}

/// Definition of a wizard step: presentation metadata, its semantic key and
/// the fields it governs. `ordinal` is assigned by the owning catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
  pub ordinal: usize,
  pub title: &'static str,
  pub description: &'static str,
  pub icon: &'static str,
  pub color: &'static str,
  pub key: StepKey,
  pub fields: Vec<&'static str>,
}

impl StepDefinition {
  pub fn is_optional(&self) -> bool {
    self.key.is_optional()
  }
}
