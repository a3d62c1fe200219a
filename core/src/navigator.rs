// stepform/src/navigator.rs

//! Step navigation: next/previous with skip rules, and direct jumps.

use crate::catalog::Catalog;
use crate::core::values::FormValues;
use crate::error::{WizardError, WizardResult};
use crate::validation::{is_step_applicable, is_step_complete};
use tracing::{event, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
  /// When true, step-indicator jumps do not require earlier steps to be complete.
  pub free_navigation: bool,
}

impl Default for Navigator {
  fn default() -> Self {
    Self { free_navigation: true }
  }
}

fn applicable(catalog: &Catalog, ordinal: usize, values: &FormValues) -> bool {
  catalog
    .step(ordinal)
    .is_some_and(|step| is_step_applicable(step.key, values))
}

impl Navigator {
  pub fn new(free_navigation: bool) -> Self {
    Self { free_navigation }
  }

  /// First applicable step after `current`, or `current` when none is left.
  pub fn next_step(&self, catalog: &Catalog, current: usize, values: &FormValues) -> usize {
    let mut target = current + 1;
    while target <= catalog.len() {
      if applicable(catalog, target, values) {
        return target;
      }
      event!(Level::DEBUG, ordinal = target, "Skipping inapplicable step.");
      target += 1;
    }
    current
  }

  /// Mirror of `next_step`.
  pub fn prev_step(&self, catalog: &Catalog, current: usize, values: &FormValues) -> usize {
    let mut target = current;
    while target > 1 {
      target -= 1;
      if applicable(catalog, target, values) {
        return target;
      }
      event!(Level::DEBUG, ordinal = target, "Skipping inapplicable step.");
    }
    current
  }

  /// Validates a direct jump to `target`. A target outside the catalog is a
  /// caller defect: it asserts in debug builds and errors in release.
  pub fn go_to_step(&self, catalog: &Catalog, target: usize, values: &FormValues) -> WizardResult<usize> {
    debug_assert!(
      catalog.contains(target),
      "Navigation target {} outside the catalog (1..={})",
      target,
      catalog.len()
    );
    if !catalog.contains(target) {
      event!(Level::ERROR, target, total = catalog.len(), "Navigation target outside the catalog.");
      return Err(WizardError::StepOutOfRange {
        target,
        total: catalog.len(),
      });
    }
    if !applicable(catalog, target, values) {
      return Err(WizardError::StepNotApplicable { ordinal: target });
    }
    if !self.free_navigation {
      let blocking = catalog.steps().iter().take(target - 1).find(|step| {
        !step.is_optional() && is_step_applicable(step.key, values) && !is_step_complete(step.key, values)
      });
      if let Some(step) = blocking {
        return Err(WizardError::StepsIncomplete { ordinal: step.ordinal });
      }
    }
    Ok(target)
  }
}
