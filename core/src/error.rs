// stepform/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WizardError {
  #[error("Step {ordinal} ('{title}') has missing or invalid fields")]
  Validation { ordinal: usize, title: String },

  #[error("Another wizard action is still in flight")]
  Busy,

  #[error("Step {target} is outside the catalog (1..={total})")]
  StepOutOfRange { target: usize, total: usize },

  #[error("Step {ordinal} does not apply to the current form values")]
  StepNotApplicable { ordinal: usize },

  #[error("Step {ordinal} must be completed before jumping ahead")]
  StepsIncomplete { ordinal: usize },

  #[error("Unknown step key: {name}")]
  UnknownStep { name: String },

  #[error("Save changes requires an existing visit record")]
  NoExistingVisit,

  #[error("Visit could not be saved: {message}")]
  Persistence { message: String },

  #[error("Upload of '{file}' failed: {message}")]
  Upload { file: String, message: String },

  #[error("HTTP transport error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Error in external collaborator. Source: {source}")]
  Collaborator {
    #[source]
    source: AnyhowError,
  },

  #[error("Wizard session has been closed")]
  Inactive,
}

// Lets custom stores and uploaders use `anyhow` internally and `?` into WizardError.
impl From<AnyhowError> for WizardError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<WizardError>() {
      Ok(wizard_err) => wizard_err,
      Err(source) => WizardError::Collaborator { source },
    }
  }
}

impl WizardError {
  /// Message suitable for a user-facing notification, when the error carries one.
  pub fn user_message(&self) -> Option<&str> {
    match self {
      WizardError::Persistence { message } | WizardError::Upload { message, .. } => Some(message.as_str()),
      _ => None,
    }
  }
}

pub type WizardResult<T, E = WizardError> = std::result::Result<T, E>;
