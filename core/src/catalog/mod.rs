// stepform/src/catalog/mod.rs

//! Defines the `Catalog` struct and the step templates of each visit form.

pub mod definition;
pub mod forms;

pub use definition::Catalog;
pub use forms::get_form_steps;
