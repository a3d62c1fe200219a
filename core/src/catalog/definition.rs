// stepform/src/catalog/definition.rs

//! Contains the `Catalog` struct: the ordered step list of one form, and the
//! methods for its construction and structural modification.

use crate::core::step::{FormType, StepDefinition, StepKey};
use serde::Serialize;

/// Ordered, contiguously numbered steps of a wizard.
///
/// Ordinals start at 1 and are reassigned after every structural change, so
/// callers must look ordinals up by key (`ordinal_of`) rather than store them
/// across catalog rebuilds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
  form_type: FormType,
  steps: Vec<StepDefinition>,
}

impl Catalog {
  pub fn new(form_type: FormType, steps: Vec<StepDefinition>) -> Self {
    let mut catalog = Self {
      form_type,
      steps: Vec::with_capacity(steps.len()),
    };
    for step in steps {
      catalog.ensure_step_not_exists(step.key);
      catalog.steps.push(step);
    }
    catalog.renumber();
    catalog
  }

  /// Panics if `key` is not in the catalog. Catalogs are assembled from
  /// static templates, so a miss here is a setup error.
  fn position_or_panic(&self, key: StepKey) -> usize {
    self
      .position(key)
      .unwrap_or_else(|| panic!("Catalog setup error: step '{}' not found in catalog.", key))
  }

  fn ensure_step_not_exists(&self, key: StepKey) {
    if self.position(key).is_some() {
      panic!("Catalog setup error: step '{}' already exists in catalog.", key);
    }
  }

  fn position(&self, key: StepKey) -> Option<usize> {
    self.steps.iter().position(|s| s.key == key)
  }

  fn renumber(&mut self) {
    for (idx, step) in self.steps.iter_mut().enumerate() {
      step.ordinal = idx + 1;
    }
  }

  // --- Basic Step Manipulation Methods ---

  pub fn insert_before_step(&mut self, existing: StepKey, step: StepDefinition) {
    let idx = self.position_or_panic(existing);
    self.ensure_step_not_exists(step.key);
    self.steps.insert(idx, step);
    self.renumber();
  }

  pub fn insert_after_step(&mut self, existing: StepKey, step: StepDefinition) {
    let idx = self.position_or_panic(existing);
    self.ensure_step_not_exists(step.key);
    self.steps.insert(idx + 1, step);
    self.renumber();
  }

  pub fn push_front(&mut self, step: StepDefinition) {
    self.ensure_step_not_exists(step.key);
    self.steps.insert(0, step);
    self.renumber();
  }

  /// Removing a key that is not present is a no-op.
  pub fn remove_step(&mut self, key: StepKey) {
    if let Some(idx) = self.position(key) {
      self.steps.remove(idx);
      self.renumber();
    }
  }

  // --- Lookups ---

  pub fn form_type(&self) -> FormType {
    self.form_type
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  pub fn steps(&self) -> &[StepDefinition] {
    &self.steps
  }

  /// Step at a 1-based ordinal.
  pub fn step(&self, ordinal: usize) -> Option<&StepDefinition> {
    ordinal.checked_sub(1).and_then(|idx| self.steps.get(idx))
  }

  pub fn by_key(&self, key: StepKey) -> Option<&StepDefinition> {
    self.steps.iter().find(|s| s.key == key)
  }

  pub fn ordinal_of(&self, key: StepKey) -> Option<usize> {
    self.position(key).map(|idx| idx + 1)
  }

  pub fn contains(&self, ordinal: usize) -> bool {
    (1..=self.steps.len()).contains(&ordinal)
  }
}
