// stepform/src/core/values.rs

//! `FormValues`: the JSON-shaped snapshot of every field in a visit form.
//!
//! Fields are addressed by name, and nested group members by dotted path
//! (`"electricalEquipment.noAplica"`). Accessors are lenient about the shapes
//! a browser form produces: numbers may arrive as numeric strings, and empty
//! strings count as "no value".

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(Map<String, Value>);

impl FormValues {
  pub fn new() -> Self {
    Self(Map::new())
  }

  /// Builds values from a JSON object. Anything else yields an empty form.
  pub fn from_json(value: Value) -> Self {
    match value {
      Value::Object(map) => Self(map),
      _ => Self::default(),
    }
  }

  pub fn as_map(&self) -> &Map<String, Value> {
    &self.0
  }

  pub fn into_json(self) -> Value {
    Value::Object(self.0)
  }

  pub fn get(&self, path: &str) -> Option<&Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = self.0.get(first)?;
    for segment in segments {
      current = current.as_object()?.get(segment)?;
    }
    Some(current)
  }

  /// Sets `path`, creating intermediate groups as needed. A non-object value
  /// sitting on an intermediate segment is replaced by a group.
  pub fn set(&mut self, path: &str, value: Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
      return;
    };
    let mut map = &mut self.0;
    for segment in segments {
      let slot = map
        .entry(segment.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
      if !slot.is_object() {
        *slot = Value::Object(Map::new());
      }
      let Value::Object(inner) = slot else {
        return;
      };
      map = inner;
    }
    map.insert(last.to_string(), value);
  }

  pub fn remove(&mut self, path: &str) -> Option<Value> {
    match path.rsplit_once('.') {
      None => self.0.remove(path),
      Some((parent, last)) => {
        let mut map = &mut self.0;
        for segment in parent.split('.') {
          map = map.get_mut(segment)?.as_object_mut()?;
        }
        map.remove(last)
      }
    }
  }

  /// Trimmed text at `path`; `None` for missing, null, non-string or blank values.
  pub fn text(&self, path: &str) -> Option<&str> {
    self
      .get(path)
      .and_then(Value::as_str)
      .map(str::trim)
      .filter(|s| !s.is_empty())
  }

  pub fn number(&self, path: &str) -> Option<f64> {
    self.get(path).and_then(number_of)
  }

  pub fn flag(&self, path: &str) -> bool {
    matches!(self.get(path), Some(Value::Bool(true)))
  }

  pub fn list(&self, path: &str) -> &[Value] {
    self
      .get(path)
      .and_then(Value::as_array)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  pub fn group(&self, path: &str) -> Option<&Map<String, Value>> {
    self.get(path).and_then(Value::as_object)
  }

  /// True when any member of the group other than `noAplica` carries data.
  pub fn group_has_data(&self, path: &str) -> bool {
    self.group(path).is_some_and(|group| {
      group
        .iter()
        .filter(|(name, _)| name.as_str() != NOT_APPLICABLE_FLAG)
        .any(|(_, value)| has_data(value))
    })
  }
}

impl From<Map<String, Value>> for FormValues {
  fn from(map: Map<String, Value>) -> Self {
    Self(map)
  }
}

/// Member name of the explicit "not applicable" flag inside optional groups.
pub const NOT_APPLICABLE_FLAG: &str = "noAplica";

/// Reads a number from a JSON number or a numeric string.
pub fn number_of(value: &Value) -> Option<f64> {
  match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  }
}

/// Whether a single value counts as "entered" by the user.
pub fn has_data(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::String(s) => !s.trim().is_empty(),
    Value::Array(items) => !items.is_empty(),
    Value::Object(members) => members.values().any(has_data),
    Value::Bool(_) | Value::Number(_) => true,
  }
}
