// stepform/src/core/form_state.rs

//! The form-state container the wizard reads from and writes through.

use crate::core::values::FormValues;
use crate::validation::fields::FieldRules;
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{event, Level};

/// Receiver side of the container's change notifications. Holds a monotonically
/// increasing version; drop it to unsubscribe.
pub type FormChanges = watch::Receiver<u64>;

struct Inner {
  values: RwLock<FormValues>,
  errors: RwLock<BTreeMap<String, String>>,
  rules: FieldRules,
  version: watch::Sender<u64>,
}

/// Shared handle to the values and per-field errors of one form, with
/// interior mutability via parking_lot::RwLock.
///
/// IMPORTANT: guards returned by `read()` are blocking and MUST NOT be held
/// across `.await` suspension points.
#[derive(Clone)]
pub struct FormState(Arc<Inner>);

impl FormState {
  pub fn new(values: FormValues, rules: FieldRules) -> Self {
    let (version, _) = watch::channel(0);
    FormState(Arc::new(Inner {
      values: RwLock::new(values),
      errors: RwLock::new(BTreeMap::new()),
      rules,
      version,
    }))
  }

  /// Snapshot of every value. Later edits do not affect the returned copy.
  pub fn get_values(&self) -> FormValues {
    self.0.values.read().clone()
  }

  /// Read guard over the live values. Drop before any `.await`.
  pub fn read(&self) -> RwLockReadGuard<'_, FormValues> {
    self.0.values.read()
  }

  pub fn map_read<F, U: ?Sized>(&self, f: F) -> MappedRwLockReadGuard<'_, U>
  where
    F: FnOnce(&FormValues) -> &U,
  {
    RwLockReadGuard::map(self.read(), f)
  }

  pub fn set_value(&self, path: &str, value: Value) {
    self.0.values.write().set(path, value);
    self.0.errors.write().remove(path);
    self.bump();
  }

  /// Replaces the whole value set, e.g. when loading a persisted record.
  pub fn reset(&self, values: FormValues) {
    *self.0.values.write() = values;
    self.0.errors.write().clear();
    self.bump();
  }

  /// Subscribes to value changes. The returned receiver only reports edits
  /// made after this call.
  pub fn watch(&self) -> FormChanges {
    self.0.version.subscribe()
  }

  pub fn version(&self) -> u64 {
    *self.0.version.borrow()
  }

  /// Runs the field rules bound to `fields` against the current values and
  /// records one message per failing field. Returns true when all pass.
  pub fn trigger(&self, fields: &[&str]) -> bool {
    let values = self.get_values();
    let mut errors = self.0.errors.write();
    let mut all_valid = true;
    for field in fields {
      errors.remove(*field);
      if let Some(message) = self.0.rules.check(field, &values) {
        event!(Level::DEBUG, %field, %message, "Field rule failed.");
        errors.insert((*field).to_string(), message);
        all_valid = false;
      }
    }
    all_valid
  }

  pub fn errors(&self) -> BTreeMap<String, String> {
    self.0.errors.read().clone()
  }

  pub fn error(&self, field: &str) -> Option<String> {
    self.0.errors.read().get(field).cloned()
  }

  fn bump(&self) {
    self.0.version.send_modify(|version| *version += 1);
  }
}

impl std::fmt::Debug for FormState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FormState")
      .field("version", &self.version())
      .field("values", &*self.0.values.read())
      .field("errors", &*self.0.errors.read())
      .finish()
  }
}
