// stepform/src/validation/mod.rs

//! Step completion rules and field-level rules.

pub mod fields;
pub mod rules;

pub use fields::{field_rules_for, FieldRule, FieldRules};
pub use rules::{is_step_applicable, is_step_complete, is_step_complete_by_name};
