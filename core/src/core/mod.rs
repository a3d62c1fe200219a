pub mod control;
pub mod form_state;
pub mod step;
pub mod values;

// Re-export key types for easier access from other modules (and lib.rs)
pub use control::{SaveIntent, VisitStatus};
pub use form_state::{FormChanges, FormState};
pub use step::{FormType, StepDefinition, StepKey};
pub use values::FormValues;
