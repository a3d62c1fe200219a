// examples/visit_wizard.rs

//! Walks an industrial visit through the wizard with an in-memory store:
//! fill, navigate, save a draft, then submit.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use stepform::{
  FileDescriptor, FileUploader, FormType, PendingFile, SaveIntent, VisitContext, VisitRecord, VisitRequest,
  VisitStore, WizardConfig, WizardResult, WizardSession,
};
use tracing::{info, Level};

#[derive(Default)]
struct InMemoryStore {
  saved: Mutex<Vec<VisitRequest>>,
}

#[async_trait]
impl VisitStore for InMemoryStore {
  async fn create(&self, request: &VisitRequest) -> WizardResult<VisitRecord> {
    self.saved.lock().push(request.clone());
    Ok(VisitRecord {
      id: "visit-1".to_string(),
      status: request.visit_data.status,
    })
  }

  async fn update(&self, id: &str, request: &VisitRequest) -> WizardResult<VisitRecord> {
    self.saved.lock().push(request.clone());
    Ok(VisitRecord {
      id: id.to_string(),
      status: request.visit_data.status,
    })
  }
}

struct LocalUploader;

#[async_trait]
impl FileUploader for LocalUploader {
  async fn upload(&self, file: &PendingFile, folder: &str) -> WizardResult<FileDescriptor> {
    Ok(FileDescriptor {
      id: file.name.clone(),
      url: format!("file:///{}/{}", folder, file.name),
      name: Some(file.name.clone()),
      format: file.content_type.clone(),
      width: None,
      height: None,
      duration: None,
    })
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt().with_max_level(Level::INFO).init();

  let store = Arc::new(InMemoryStore::default());
  let session = WizardSession::builder(FormType::Industrial, VisitContext::new("acct-42"))
    .config(WizardConfig::from_env()?)
    .store(store.clone())
    .uploader(Arc::new(LocalUploader))
    .build()?;

  let form = session.form();
  form.set_value("productDescription", json!("Palletised beverages"));
  session.next()?;

  form.set_value("operationNotes", json!("Two shifts, indoor"));
  form.set_value("powerType", json!("DIESEL"));
  let step = session.next()?;
  info!(step, "Electrical equipment skipped for diesel.");

  session.save(SaveIntent::Draft).await?;
  info!(progress = session.completion().progress, "Draft saved.");

  form.set_value(
    "loadDimensions",
    json!([
      { "description": "Euro pallet", "percentage": 70 },
      { "description": "Half pallet", "percentage": 30 }
    ]),
  );
  session
    .upload_files(vec![PendingFile {
      name: "dock.jpg".to_string(),
      content_type: Some("image/jpeg".to_string()),
      bytes: vec![0xFF, 0xD8],
    }])
    .await?;

  let record = session.save(SaveIntent::Submit).await?;
  info!(id = %record.id, status = ?record.status, saves = store.saved.lock().len(), "Visit submitted.");

  session.close();
  Ok(())
}
