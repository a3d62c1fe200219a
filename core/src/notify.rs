// stepform/src/notify.rs

//! The notification sink the wizard reports outcomes to (toasts, in a UI host).

use tracing::{event, Level};

/// Localized message identifiers. The host resolves them to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
  DraftSaved,
  Submitted,
  ChangesSaved,
  SaveFailed,
  StepIncomplete,
  FileUploadFailed,
  FilesUploaded,
}

impl MessageKey {
  pub fn as_str(&self) -> &'static str {
    match self {
      MessageKey::DraftSaved => "visit.draftSaved",
      MessageKey::Submitted => "visit.submitted",
      MessageKey::ChangesSaved => "visit.changesSaved",
      MessageKey::SaveFailed => "visit.saveFailed",
      MessageKey::StepIncomplete => "wizard.stepIncomplete",
      MessageKey::FileUploadFailed => "upload.fileFailed",
      MessageKey::FilesUploaded => "upload.completed",
    }
  }
}

/// Receives success and error notifications. `detail` carries a
/// collaborator-provided message when there is one.
pub trait Notifier: Send + Sync {
  fn success(&self, key: MessageKey);
  fn error(&self, key: MessageKey, detail: Option<&str>);
}

/// Notifier that only logs. Used when the host does not plug in its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
  fn success(&self, key: MessageKey) {
    event!(Level::INFO, message_key = key.as_str(), "Success notification.");
  }

  fn error(&self, key: MessageKey, detail: Option<&str>) {
    event!(Level::WARN, message_key = key.as_str(), detail = detail.unwrap_or(""), "Error notification.");
  }
}
