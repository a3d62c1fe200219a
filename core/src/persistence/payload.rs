// stepform/src/persistence/payload.rs

//! Builds the create/update request body from a form snapshot and the visit context.

use crate::core::control::{SaveIntent, VisitStatus};
use crate::core::step::FormType;
use crate::core::values::{FormValues, NOT_APPLICABLE_FLAG};
use crate::error::{WizardError, WizardResult};
use crate::validation::rules::is_electric;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Groups judged by "has any data"; their null members are never sent.
const DETAIL_GROUPS: [&str; 3] = ["electricalEquipment", "specialLoad", "aisle"];
const ELECTRICAL_GROUP: &str = "electricalEquipment";

/// A visit that already exists remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingVisit {
  pub id: String,
  pub status: VisitStatus,
}

/// References that tie a visit to its surroundings: the owning account, an
/// optional CRM task and an optional assigned seller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitContext {
  pub owner_entity_id: String,
  pub related_task_id: Option<String>,
  pub assigned_secondary_party_id: Option<String>,
  /// Set when editing; selects update over create.
  pub existing: Option<ExistingVisit>,
}

impl VisitContext {
  pub fn new(owner_entity_id: impl Into<String>) -> Self {
    Self {
      owner_entity_id: owner_entity_id.into(),
      ..Default::default()
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitData {
  pub owner_entity_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub related_task_id: Option<String>,
  pub form_type: FormType,
  pub status: VisitStatus,
  pub locale: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub assigned_secondary_party_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRequest {
  pub visit_data: VisitData,
  pub formulario_data: Value,
}

pub fn build_request(
  context: &VisitContext,
  form_type: FormType,
  intent: SaveIntent,
  locale: &str,
  snapshot: &FormValues,
) -> WizardResult<VisitRequest> {
  let existing_status = context.existing.as_ref().map(|visit| visit.status);
  let status = intent
    .target_status(existing_status)
    .ok_or(WizardError::NoExistingVisit)?;

  Ok(VisitRequest {
    visit_data: VisitData {
      owner_entity_id: context.owner_entity_id.clone(),
      related_task_id: context.related_task_id.clone(),
      form_type,
      status,
      locale: locale.to_string(),
      assigned_secondary_party_id: context.assigned_secondary_party_id.clone(),
    },
    formulario_data: prune_form_values(snapshot).into_json(),
  })
}

/// Drops detail that does not apply to the submitted values. Works on a copy.
///
/// The electrical group is dropped unless the power type is ELECTRIC; an
/// explicit "not applicable" tick survives as `{ "noAplica": true }`. Null
/// members of detail groups are omitted and groups left empty are removed.
pub fn prune_form_values(snapshot: &FormValues) -> FormValues {
  let mut pruned = snapshot.clone();

  if !is_electric(snapshot) {
    if pruned.flag(&format!("{ELECTRICAL_GROUP}.{NOT_APPLICABLE_FLAG}")) {
      pruned.set(ELECTRICAL_GROUP, json!({ NOT_APPLICABLE_FLAG: true }));
    } else {
      pruned.remove(ELECTRICAL_GROUP);
    }
  }

  for group in DETAIL_GROUPS {
    let Some(members) = pruned.group(group) else {
      if pruned.get(group).is_some_and(Value::is_null) {
        pruned.remove(group);
      }
      continue;
    };
    let kept: serde_json::Map<String, Value> = members
      .iter()
      .filter(|(_, value)| !value.is_null())
      .map(|(name, value)| (name.clone(), value.clone()))
      .collect();
    if kept.is_empty() {
      pruned.remove(group);
    } else {
      pruned.set(group, Value::Object(kept));
    }
  }

  pruned
}
