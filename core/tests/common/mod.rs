// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use stepform::{
  FileDescriptor, FileUploader, FormType, FormValues, MessageKey, Notifier, PendingFile, VisitContext, VisitRecord,
  VisitRequest, VisitStatus, VisitStore, WizardConfig, WizardError, WizardResult, WizardSession,
};
use tracing::Level;

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Notifier that records what the host would have shown ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
  Success(MessageKey),
  Error(MessageKey, Option<String>),
}

#[derive(Default)]
pub struct RecordingNotifier {
  notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
  pub fn notices(&self) -> Vec<Notice> {
    self.notices.lock().clone()
  }
}

impl Notifier for RecordingNotifier {
  fn success(&self, key: MessageKey) {
    self.notices.lock().push(Notice::Success(key));
  }

  fn error(&self, key: MessageKey, detail: Option<&str>) {
    self.notices.lock().push(Notice::Error(key, detail.map(String::from)));
  }
}

// --- In-memory visit store ---
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
  Create(VisitRequest),
  Update(String, VisitRequest),
}

pub struct MockVisitStore {
  pub calls: Mutex<Vec<StoreCall>>,
  pub delay: Option<Duration>,
  /// Message of the next failure, if the store should fail.
  pub fail_with: Mutex<Option<String>>,
  next_id: AtomicUsize,
}

impl MockVisitStore {
  pub fn new() -> Self {
    Self {
      calls: Mutex::new(Vec::new()),
      delay: None,
      fail_with: Mutex::new(None),
      next_id: AtomicUsize::new(1),
    }
  }

  pub fn slow(delay: Duration) -> Self {
    Self {
      delay: Some(delay),
      ..Self::new()
    }
  }

  pub fn failing(message: &str) -> Self {
    let store = Self::new();
    *store.fail_with.lock() = Some(message.to_string());
    store
  }

  pub fn calls(&self) -> Vec<StoreCall> {
    self.calls.lock().clone()
  }

  async fn respond(&self, id: String, request: &VisitRequest) -> WizardResult<VisitRecord> {
    if let Some(delay) = self.delay {
      tokio::time::sleep(delay).await;
    }
    let failure = self.fail_with.lock().clone();
    if let Some(message) = failure {
      return Err(WizardError::Persistence { message });
    }
    Ok(VisitRecord {
      id,
      status: request.visit_data.status,
    })
  }
}

#[async_trait]
impl VisitStore for MockVisitStore {
  async fn create(&self, request: &VisitRequest) -> WizardResult<VisitRecord> {
    self.calls.lock().push(StoreCall::Create(request.clone()));
    let id = format!("visit-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
    self.respond(id, request).await
  }

  async fn update(&self, id: &str, request: &VisitRequest) -> WizardResult<VisitRecord> {
    self.calls.lock().push(StoreCall::Update(id.to_string(), request.clone()));
    self.respond(id.to_string(), request).await
  }
}

// --- Uploader that rejects files by name ---
pub struct MockUploader {
  pub rejected: Vec<String>,
  pub attempts: AtomicUsize,
}

impl MockUploader {
  pub fn rejecting(names: &[&str]) -> Self {
    Self {
      rejected: names.iter().map(|name| name.to_string()).collect(),
      attempts: AtomicUsize::new(0),
    }
  }
}

#[async_trait]
impl FileUploader for MockUploader {
  async fn upload(&self, file: &PendingFile, folder: &str) -> WizardResult<FileDescriptor> {
    self.attempts.fetch_add(1, Ordering::SeqCst);
    if self.rejected.contains(&file.name) {
      return Err(WizardError::Upload {
        file: file.name.clone(),
        message: "file type not allowed".to_string(),
      });
    }
    Ok(FileDescriptor {
      id: format!("file-{}", file.name),
      url: format!("https://cdn.test/{}/{}", folder, file.name),
      name: Some(file.name.clone()),
      format: file.content_type.clone(),
      width: None,
      height: None,
      duration: None,
    })
  }
}

pub fn pending(name: &str) -> PendingFile {
  PendingFile {
    name: name.to_string(),
    content_type: Some("image/jpeg".to_string()),
    bytes: vec![0xFF, 0xD8, 0xFF],
  }
}

// --- Value fixtures ---
pub fn values(v: Value) -> FormValues {
  FormValues::from_json(v)
}

/// Every required industrial step complete, on diesel power.
pub fn complete_industrial_values() -> FormValues {
  values(json!({
    "productDescription": "Palletised beverages",
    "operationNotes": "Two shifts, indoor",
    "powerType": "DIESEL",
    "loadDimensions": [
      { "description": "Euro pallet", "percentage": 60 },
      { "description": "Half pallet", "percentage": "40" }
    ]
  }))
}

/// Every required straddle-carrier step complete, on electric power.
pub fn complete_straddle_values() -> FormValues {
  values(json!({
    "operationNotes": "Quay to yard",
    "powerType": "ELECTRIC",
    "electricalEquipment": { "noAplica": false, "batteryVoltage": 80 },
    "containerTypes": ["20ft", "40ft"],
    "containersPerShift": 120,
    "specialLoad": { "noAplica": true },
    "instructions": "Report to gate 3"
  }))
}

pub fn test_config() -> WizardConfig {
  WizardConfig {
    debounce: Duration::from_millis(20),
    ..WizardConfig::default()
  }
}

pub struct Harness {
  pub session: WizardSession,
  pub store: Arc<MockVisitStore>,
  pub notifier: Arc<RecordingNotifier>,
}

pub fn harness(form_type: FormType, initial: FormValues, store: MockVisitStore) -> Harness {
  harness_with_context(form_type, initial, store, VisitContext::new("acct-42"))
}

pub fn harness_with_context(
  form_type: FormType,
  initial: FormValues,
  store: MockVisitStore,
  context: VisitContext,
) -> Harness {
  let store = Arc::new(store);
  let notifier = Arc::new(RecordingNotifier::default());
  let session = WizardSession::builder(form_type, context)
    .values(initial)
    .config(test_config())
    .store(store.clone())
    .uploader(Arc::new(MockUploader::rejecting(&[])))
    .notifier(notifier.clone())
    .build()
    .expect("session should build");
  Harness {
    session,
    store,
    notifier,
  }
}

pub fn existing(id: &str, status: VisitStatus) -> VisitContext {
  VisitContext {
    existing: Some(stepform::ExistingVisit {
      id: id.to_string(),
      status,
    }),
    ..VisitContext::new("acct-42")
  }
}
