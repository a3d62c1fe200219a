// stepform/src/core/control.rs

//! Defines the persistence intents a user can trigger and the record statuses they map to.

use serde::{Deserialize, Serialize};

/// What the user asked for when leaving the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveIntent {
  /// Persist the current values as a draft. No validation.
  Draft,
  /// Validate every applicable required step, then persist as completed.
  Submit,
  /// Update an existing record, keeping whatever status it already has.
  SaveChanges,
}

/// Status of a persisted visit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitStatus {
  Draft,
  InProgress,
  Completed,
}

impl SaveIntent {
  /// Target status for this intent. `SaveChanges` keeps `existing`; it is `None`
  /// when there is no existing record to keep a status from.
  pub fn target_status(&self, existing: Option<VisitStatus>) -> Option<VisitStatus> {
    match self {
      SaveIntent::Draft => Some(VisitStatus::Draft),
      SaveIntent::Submit => Some(VisitStatus::Completed),
      SaveIntent::SaveChanges => existing,
    }
  }
}
