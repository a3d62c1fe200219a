// src/lib.rs

//! Stepform: the engine behind a multi-step visit form wizard.
//!
//! A visit form is an ordered catalog of steps whose shape depends on the form
//! type (industrial or straddle carrier). The engine:
//!  - Builds the step catalog, optionally inserting a customer-data step.
//!  - Holds the shared form values and per-field validation messages.
//!  - Decides, per step, whether it applies and whether it is complete.
//!  - Tracks progress with a debounced completed set plus on-demand totals.
//!  - Navigates forward, back and by direct jump, skipping steps that do not apply.
//!  - Persists drafts, submissions and edits through a pluggable `VisitStore`.
//!  - Uploads attachments one by one through a pluggable `FileUploader`.

pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod navigator;
pub mod notify;
pub mod persistence;
pub mod session;
pub mod tracker;
pub mod validation;

// --- Re-exports for the Public API ---

pub use crate::core::control::{SaveIntent, VisitStatus};
pub use crate::core::form_state::{FormChanges, FormState};
pub use crate::core::step::{FormType, StepDefinition, StepKey};
pub use crate::core::values::FormValues;

pub use crate::catalog::{get_form_steps, Catalog};
pub use crate::config::WizardConfig;
pub use crate::error::{WizardError, WizardResult};
pub use crate::navigator::Navigator;
pub use crate::notify::{MessageKey, Notifier, TracingNotifier};
pub use crate::persistence::{
  ExistingVisit, FileDescriptor, FileUploader, HttpFileUploader, HttpVisitStore, PendingFile, VisitContext,
  VisitRecord, VisitRequest, VisitStore,
};
pub use crate::session::{FailedUpload, UploadReport, WizardSession, WizardSessionBuilder};
pub use crate::tracker::{evaluate, CompletedSteps, Completion, CompletionTracker};
pub use crate::validation::{is_step_applicable, is_step_complete, is_step_complete_by_name};

/*
    Typical flow:
    1. Load a `WizardConfig` (usually `WizardConfig::from_env()`).
    2. Build a session with `WizardSession::builder(form_type, VisitContext::new(account_id))`,
       seeding `.values(...)` and plugging a `.notifier(...)` for the host's toasts.
    3. Write field changes through `session.form().set_value(path, value)`.
    4. Drive the steps with `next()`, `prev()` and `go_to_step(n)`; read
       `completion()` for progress and `completed_steps()` for indicators.
    5. Call `save(SaveIntent::Draft)` at any time, `save(SaveIntent::Submit)` at the end,
       or `save(SaveIntent::SaveChanges)` when editing.
    6. Call `close()` when the host dismisses the wizard.
*/
