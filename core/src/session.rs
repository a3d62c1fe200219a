// stepform/src/session.rs

//! `WizardSession`: one open visit form. Ties the catalog, form state,
//! completion tracker, navigator and persistence collaborators together and
//! serializes the user actions that must not overlap.

use crate::catalog::{get_form_steps, Catalog};
use crate::config::WizardConfig;
use crate::core::control::SaveIntent;
use crate::core::form_state::FormState;
use crate::core::step::{FormType, StepDefinition};
use crate::core::values::FormValues;
use crate::error::{WizardError, WizardResult};
use crate::navigator::Navigator;
use crate::notify::{MessageKey, Notifier, TracingNotifier};
use crate::persistence::{
  build_request, ExistingVisit, FileDescriptor, FileUploader, HttpFileUploader, HttpVisitStore, PendingFile,
  VisitContext, VisitRecord, VisitStore, GENERIC_SAVE_ERROR,
};
use crate::tracker::{CompletedSteps, Completion, CompletionTracker};
use crate::validation::{field_rules_for, is_step_applicable, is_step_complete};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{event, instrument, Level};

/// Outcome of `upload_files`: successful descriptors, and the files that failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadReport {
  pub uploaded: Vec<FileDescriptor>,
  pub failed: Vec<FailedUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUpload {
  pub name: String,
  pub message: String,
}

struct Inner {
  form_type: FormType,
  config: WizardConfig,
  form: FormState,
  navigator: Navigator,
  catalog: RwLock<Arc<Catalog>>,
  tracker: Mutex<CompletionTracker>,
  current: Mutex<usize>,
  context: Mutex<VisitContext>,
  store: Arc<dyn VisitStore>,
  uploader: Arc<dyn FileUploader>,
  notifier: Arc<dyn Notifier>,
  busy: AtomicBool,
  active: AtomicBool,
}

/// Cheap to clone; every clone drives the same session.
#[derive(Clone)]
pub struct WizardSession {
  inner: Arc<Inner>,
}

/// Clears the busy flag when the action ends, whether it succeeded or not.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::SeqCst);
  }
}

impl WizardSession {
  pub fn builder(form_type: FormType, context: VisitContext) -> WizardSessionBuilder {
    WizardSessionBuilder {
      form_type,
      context,
      values: FormValues::new(),
      config: WizardConfig::default(),
      customer_data: None,
      store: None,
      uploader: None,
      notifier: None,
    }
  }

  // --- State accessors ---

  pub fn form_type(&self) -> FormType {
    self.inner.form_type
  }

  pub fn form(&self) -> &FormState {
    &self.inner.form
  }

  pub fn catalog(&self) -> Arc<Catalog> {
    self.inner.catalog.read().clone()
  }

  pub fn current_step(&self) -> usize {
    *self.inner.current.lock()
  }

  pub fn current_definition(&self) -> Option<StepDefinition> {
    self.catalog().step(self.current_step()).cloned()
  }

  pub fn context(&self) -> VisitContext {
    self.inner.context.lock().clone()
  }

  /// Completion evaluated from the live values. Use this for progress and
  /// submit gating.
  pub fn completion(&self) -> Completion {
    self.inner.tracker.lock().completion()
  }

  /// Debounced completed set, for step indicators.
  pub fn completed_steps(&self) -> CompletedSteps {
    self.inner.tracker.lock().completed()
  }

  pub fn subscribe_completed(&self) -> watch::Receiver<CompletedSteps> {
    self.inner.tracker.lock().subscribe()
  }

  pub fn is_busy(&self) -> bool {
    self.inner.busy.load(Ordering::SeqCst)
  }

  pub fn is_active(&self) -> bool {
    self.inner.active.load(Ordering::SeqCst)
  }

  /// Marks the session as gone (dialog closed). In-flight actions finish
  /// without touching state or notifying; new actions fail with `Inactive`.
  pub fn close(&self) {
    self.inner.active.store(false, Ordering::SeqCst);
    event!(Level::DEBUG, form_type = self.inner.form_type.as_str(), "Wizard session closed.");
  }

  fn begin_action(&self) -> WizardResult<BusyGuard<'_>> {
    if !self.is_active() {
      return Err(WizardError::Inactive);
    }
    self
      .inner
      .busy
      .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
      .map_err(|_| WizardError::Busy)?;
    Ok(BusyGuard(&self.inner.busy))
  }

  // --- Navigation ---

  /// Runs the field rules of the current step. Failing fields get messages
  /// in the form state.
  pub fn validate_current_step(&self) -> bool {
    match self.current_definition() {
      Some(step) => self.inner.form.trigger(&step.fields),
      None => false,
    }
  }

  /// Validates the current step and moves to the next applicable one.
  pub fn next(&self) -> WizardResult<usize> {
    let _busy = self.begin_action()?;
    let catalog = self.catalog();
    let current = self.current_step();
    let step = catalog.step(current).ok_or(WizardError::StepOutOfRange {
      target: current,
      total: catalog.len(),
    })?;

    if !self.inner.form.trigger(&step.fields) {
      event!(Level::INFO, ordinal = current, step_key = step.key.as_str(), "Step failed validation; staying.");
      self.inner.notifier.error(MessageKey::StepIncomplete, Some(step.title));
      return Err(WizardError::Validation {
        ordinal: current,
        title: step.title.to_string(),
      });
    }

    let values = self.inner.form.get_values();
    let target = self.inner.navigator.next_step(&catalog, current, &values);
    *self.inner.current.lock() = target;
    event!(Level::DEBUG, from = current, to = target, "Moved forward.");
    Ok(target)
  }

  pub fn prev(&self) -> WizardResult<usize> {
    let _busy = self.begin_action()?;
    let catalog = self.catalog();
    let current = self.current_step();
    let values = self.inner.form.get_values();
    let target = self.inner.navigator.prev_step(&catalog, current, &values);
    *self.inner.current.lock() = target;
    event!(Level::DEBUG, from = current, to = target, "Moved back.");
    Ok(target)
  }

  /// Direct jump from a step indicator.
  pub fn go_to_step(&self, target: usize) -> WizardResult<usize> {
    let _busy = self.begin_action()?;
    let catalog = self.catalog();
    let values = self.inner.form.get_values();
    let target = self.inner.navigator.go_to_step(&catalog, target, &values)?;
    *self.inner.current.lock() = target;
    Ok(target)
  }

  /// Adds or removes the customer-data step. The catalog is rebuilt, the
  /// current step is remapped by key and the tracker restarts on the new
  /// ordinals. Rejected while another action is in flight or after `close`.
  #[instrument(name = "WizardSession::set_customer_data_step", skip(self), err(Display))]
  pub fn set_customer_data_step(&self, enabled: bool, before_files: bool) -> WizardResult<()> {
    let _busy = self.begin_action()?;
    let rebuilt = Arc::new(get_form_steps(self.inner.form_type, enabled, before_files));
    let mut catalog = self.inner.catalog.write();
    let mut current = self.inner.current.lock();
    let current_key = catalog.step(*current).map(|step| step.key);
    *current = current_key.and_then(|key| rebuilt.ordinal_of(key)).unwrap_or(1);
    *catalog = rebuilt.clone();
    *self.inner.tracker.lock() = CompletionTracker::spawn(self.inner.form.clone(), rebuilt, self.inner.config.debounce);
    event!(Level::DEBUG, num_steps = catalog.len(), current = *current, "Catalog rebuilt.");
    Ok(())
  }

  // --- Persistence ---

  /// Persists the current values. `Submit` first re-validates every
  /// applicable required step. Updates when the visit already exists,
  /// creates otherwise.
  #[instrument(
    name = "WizardSession::save",
    skip(self),
    fields(form_type = self.inner.form_type.as_str()),
    err(Display)
  )]
  pub async fn save(&self, intent: SaveIntent) -> WizardResult<VisitRecord> {
    let _busy = self.begin_action()?;
    if intent == SaveIntent::Submit {
      self.validate_for_submit()?;
    }

    let (request, existing_id) = {
      let context = self.inner.context.lock();
      let snapshot = self.inner.form.get_values();
      let request = build_request(&context, self.inner.form_type, intent, &self.inner.config.locale, &snapshot)?;
      (request, context.existing.as_ref().map(|visit| visit.id.clone()))
    };

    let outcome = match &existing_id {
      Some(id) => self.inner.store.update(id, &request).await,
      None => self.inner.store.create(&request).await,
    };

    if !self.is_active() {
      event!(Level::DEBUG, "Session closed while saving; skipping state updates.");
      return outcome;
    }

    match outcome {
      Ok(record) => {
        self.inner.context.lock().existing = Some(ExistingVisit {
          id: record.id.clone(),
          status: record.status,
        });
        self.inner.notifier.success(success_key(intent));
        event!(Level::INFO, visit_id = %record.id, status = ?record.status, "Visit saved.");
        Ok(record)
      }
      Err(err) => {
        let detail = err.user_message().unwrap_or(GENERIC_SAVE_ERROR);
        self.inner.notifier.error(MessageKey::SaveFailed, Some(detail));
        Err(err)
      }
    }
  }

  fn validate_for_submit(&self) -> WizardResult<()> {
    let catalog = self.catalog();
    let values = self.inner.form.get_values();
    let mut first_failure: Option<&StepDefinition> = None;

    for step in catalog.steps() {
      if step.is_optional() || !is_step_applicable(step.key, &values) {
        continue;
      }
      // Trigger every step so each failing field gets its message.
      let fields_ok = self.inner.form.trigger(&step.fields);
      if !(fields_ok && is_step_complete(step.key, &values)) && first_failure.is_none() {
        first_failure = Some(step);
      }
    }

    match first_failure {
      Some(step) => {
        self.inner.notifier.error(MessageKey::StepIncomplete, Some(step.title));
        Err(WizardError::Validation {
          ordinal: step.ordinal,
          title: step.title.to_string(),
        })
      }
      None => Ok(()),
    }
  }

  /// Uploads each file on its own. Failures drop only the failing file and
  /// notify per file; successful descriptors are appended to `files`.
  #[instrument(name = "WizardSession::upload_files", skip_all, fields(count = files.len()))]
  pub async fn upload_files(&self, files: Vec<PendingFile>) -> WizardResult<UploadReport> {
    let _busy = self.begin_action()?;
    let folder = self.inner.config.upload_folder.as_str();
    let mut report = UploadReport::default();

    for file in files {
      match self.inner.uploader.upload(&file, folder).await {
        Ok(descriptor) => report.uploaded.push(descriptor),
        Err(err) => {
          let message = err.user_message().map(String::from).unwrap_or_else(|| err.to_string());
          event!(Level::WARN, file = %file.name, %message, "File upload failed.");
          if self.is_active() {
            let detail = format!("{}: {}", file.name, message);
            self.inner.notifier.error(MessageKey::FileUploadFailed, Some(detail.as_str()));
          }
          report.failed.push(FailedUpload { name: file.name, message });
        }
      }
    }

    if !self.is_active() || report.uploaded.is_empty() {
      return Ok(report);
    }

    let mut stored = self.inner.form.read().list("files").to_vec();
    for descriptor in &report.uploaded {
      stored.push(serde_json::to_value(descriptor)?);
    }
    self.inner.form.set_value("files", Value::Array(stored));
    self.inner.notifier.success(MessageKey::FilesUploaded);
    Ok(report)
  }
}

fn success_key(intent: SaveIntent) -> MessageKey {
  match intent {
    SaveIntent::Draft => MessageKey::DraftSaved,
    SaveIntent::Submit => MessageKey::Submitted,
    SaveIntent::SaveChanges => MessageKey::ChangesSaved,
  }
}

pub struct WizardSessionBuilder {
  form_type: FormType,
  context: VisitContext,
  values: FormValues,
  config: WizardConfig,
  customer_data: Option<bool>,
  store: Option<Arc<dyn VisitStore>>,
  uploader: Option<Arc<dyn FileUploader>>,
  notifier: Option<Arc<dyn Notifier>>,
}

impl WizardSessionBuilder {
  /// Initial values: seeded from an account for new visits, or the persisted
  /// form for edits.
  pub fn values(mut self, values: FormValues) -> Self {
    self.values = values;
    self
  }

  pub fn config(mut self, config: WizardConfig) -> Self {
    self.config = config;
    self
  }

  /// Enables the customer-data step, placed first or right before files.
  pub fn customer_data_step(mut self, before_files: bool) -> Self {
    self.customer_data = Some(before_files);
    self
  }

  pub fn store(mut self, store: Arc<dyn VisitStore>) -> Self {
    self.store = Some(store);
    self
  }

  pub fn uploader(mut self, uploader: Arc<dyn FileUploader>) -> Self {
    self.uploader = Some(uploader);
    self
  }

  pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
    self.notifier = Some(notifier);
    self
  }

  /// Builds the session and starts its completion tracker. Must be called
  /// from within a Tokio runtime. Missing collaborators default to the HTTP
  /// implementations and the tracing notifier.
  pub fn build(self) -> WizardResult<WizardSession> {
    let store: Arc<dyn VisitStore> = match self.store {
      Some(store) => store,
      None => Arc::new(HttpVisitStore::from_config(&self.config)?),
    };
    let uploader: Arc<dyn FileUploader> = match self.uploader {
      Some(uploader) => uploader,
      None => Arc::new(HttpFileUploader::from_config(&self.config)?),
    };
    let notifier = self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier));

    let catalog = Arc::new(get_form_steps(
      self.form_type,
      self.customer_data.is_some(),
      self.customer_data.unwrap_or(false),
    ));
    let form = FormState::new(self.values, field_rules_for(self.form_type));
    let tracker = CompletionTracker::spawn(form.clone(), catalog.clone(), self.config.debounce);

    event!(
      Level::DEBUG,
      form_type = self.form_type.as_str(),
      num_steps = catalog.len(),
      editing = self.context.existing.is_some(),
      "Wizard session built."
    );

    Ok(WizardSession {
      inner: Arc::new(Inner {
        form_type: self.form_type,
        navigator: Navigator::new(self.config.free_navigation),
        config: self.config,
        form,
        catalog: RwLock::new(catalog),
        tracker: Mutex::new(tracker),
        current: Mutex::new(1),
        context: Mutex::new(self.context),
        store,
        uploader,
        notifier,
        busy: AtomicBool::new(false),
        active: AtomicBool::new(true),
      }),
    })
  }
}
