// stepform/src/validation/fields.rs

//! Field-level rules run by `FormState::trigger` when the user leaves a step
//! or submits. They produce per-field messages, whereas the step rules in
//! `rules.rs` only answer "is this step done".

use crate::core::step::FormType;
use crate::core::values::FormValues;
use crate::validation::rules::{is_email, percentage_rows_complete, MIN_PRODUCT_DESCRIPTION_CHARS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRule {
  /// Non-empty after trimming (text) or present (any other value).
  Required,
  MinLength(usize),
  Email,
  Positive,
  NonEmptyList,
  /// Repeatable rows whose `percentage` column must add up to 100.
  PercentageRows,
}

impl FieldRule {
  /// Returns the failure message, or `None` when `field` satisfies the rule.
  pub fn check(&self, field: &str, values: &FormValues) -> Option<String> {
    let ok = match self {
      FieldRule::Required => match values.get(field) {
        Some(serde_json::Value::String(_)) => values.text(field).is_some(),
        Some(value) => !value.is_null(),
        None => false,
      },
      FieldRule::MinLength(min) => values.text(field).is_some_and(|text| text.chars().count() >= *min),
      FieldRule::Email => values.text(field).is_some_and(is_email),
      FieldRule::Positive => values.number(field).is_some_and(|n| n > 0.0),
      FieldRule::NonEmptyList => !values.list(field).is_empty(),
      FieldRule::PercentageRows => percentage_rows_complete(values.list(field)),
    };
    if ok {
      return None;
    }
    Some(match self {
      FieldRule::Required => format!("{field} is required"),
      FieldRule::MinLength(min) => format!("{field} needs at least {min} characters"),
      FieldRule::Email => format!("{field} must be a valid email address"),
      FieldRule::Positive => format!("{field} must be greater than zero"),
      FieldRule::NonEmptyList => format!("{field} needs at least one entry"),
      FieldRule::PercentageRows => format!("{field} rows need a description and percentages adding up to 100"),
    })
  }
}

/// The rule table of one form, keyed by field path.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
  rules: Vec<(&'static str, FieldRule)>,
}

impl FieldRules {
  pub fn new(rules: Vec<(&'static str, FieldRule)>) -> Self {
    Self { rules }
  }

  /// First failing rule for `field`, if any.
  pub fn check(&self, field: &str, values: &FormValues) -> Option<String> {
    self
      .rules
      .iter()
      .filter(|(name, _)| *name == field)
      .find_map(|(_, rule)| rule.check(field, values))
  }

  pub fn has_rules_for(&self, field: &str) -> bool {
    self.rules.iter().any(|(name, _)| *name == field)
  }
}

/// Field rules for every required field of `form_type`. Groups judged by
/// "has any data" carry no field rules.
pub fn field_rules_for(form_type: FormType) -> FieldRules {
  let mut rules = vec![
    ("customerData.companyName", FieldRule::Required),
    ("customerData.contactName", FieldRule::Required),
    ("customerData.contactEmail", FieldRule::Required),
    ("customerData.contactEmail", FieldRule::Email),
    ("operationNotes", FieldRule::Required),
    ("powerType", FieldRule::Required),
  ];
  match form_type {
    FormType::Industrial => rules.extend([
      ("productDescription", FieldRule::Required),
      ("productDescription", FieldRule::MinLength(MIN_PRODUCT_DESCRIPTION_CHARS)),
      ("loadDimensions", FieldRule::NonEmptyList),
      ("loadDimensions", FieldRule::PercentageRows),
    ]),
    FormType::StraddleCarrier => rules.extend([
      ("containerTypes", FieldRule::NonEmptyList),
      ("containersPerShift", FieldRule::Positive),
      ("instructions", FieldRule::Required),
    ]),
  }
  FieldRules::new(rules)
}
