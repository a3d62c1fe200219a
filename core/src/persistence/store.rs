// stepform/src/persistence/store.rs

//! The `VisitStore` seam and its HTTP implementation.

use crate::config::WizardConfig;
use crate::core::control::VisitStatus;
use crate::error::{WizardError, WizardResult};
use crate::persistence::payload::VisitRequest;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{event, instrument, Level};

/// Shown when the collaborator fails without a message of its own.
pub const GENERIC_SAVE_ERROR: &str = "The visit could not be saved. Please try again.";

/// What the store reports back about a saved visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
  pub id: String,
  pub status: VisitStatus,
}

/// Creates and updates visit records. Implementations make a single attempt;
/// retrying is left to the user.
#[async_trait]
pub trait VisitStore: Send + Sync {
  async fn create(&self, request: &VisitRequest) -> WizardResult<VisitRecord>;
  async fn update(&self, id: &str, request: &VisitRequest) -> WizardResult<VisitRecord>;
}

/// `POST {base}/visits` and `PUT {base}/visits/{id}` over reqwest.
#[derive(Debug, Clone)]
pub struct HttpVisitStore {
  client: Client,
  base_url: String,
}

impl HttpVisitStore {
  pub fn new(base_url: impl Into<String>, timeout: Duration) -> WizardResult<Self> {
    let client = Client::builder().user_agent("stepform").timeout(timeout).build()?;
    Ok(Self {
      client,
      base_url: base_url.into().trim_end_matches('/').to_string(),
    })
  }

  pub fn from_config(config: &WizardConfig) -> WizardResult<Self> {
    Self::new(config.api_base_url.clone(), config.request_timeout)
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }
}

#[async_trait]
impl VisitStore for HttpVisitStore {
  #[instrument(name = "HttpVisitStore::create", skip_all, fields(owner = %request.visit_data.owner_entity_id), err(Display))]
  async fn create(&self, request: &VisitRequest) -> WizardResult<VisitRecord> {
    let url = format!("{}/visits", self.base_url);
    event!(Level::DEBUG, %url, status = ?request.visit_data.status, "Creating visit.");
    let response = self.client.post(&url).json(request).send().await?;
    read_record(response).await
  }

  #[instrument(name = "HttpVisitStore::update", skip(self, request), err(Display))]
  async fn update(&self, id: &str, request: &VisitRequest) -> WizardResult<VisitRecord> {
    let url = format!("{}/visits/{}", self.base_url, id);
    event!(Level::DEBUG, %url, status = ?request.visit_data.status, "Updating visit.");
    let response = self.client.put(&url).json(request).send().await?;
    read_record(response).await
  }
}

/// Extracts a record from a success response, or the collaborator's message
/// from a failure. Bodies may wrap the record in `data` or `visit`, and may
/// report failure in-band with `"success": false`.
async fn read_record(response: Response) -> WizardResult<VisitRecord> {
  let status = response.status();
  let text = response.text().await?;
  let body: Option<Value> = serde_json::from_str(&text).ok();

  let reported_failure = body
    .as_ref()
    .and_then(|b| b.get("success"))
    .and_then(Value::as_bool)
    == Some(false);

  if !status.is_success() || reported_failure {
    let message = body
      .as_ref()
      .and_then(error_message)
      .unwrap_or_else(|| GENERIC_SAVE_ERROR.to_string());
    event!(Level::WARN, http_status = status.as_u16(), %message, "Visit store rejected the request.");
    return Err(WizardError::Persistence { message });
  }

  let body = body.ok_or_else(|| WizardError::Persistence {
    message: GENERIC_SAVE_ERROR.to_string(),
  })?;
  let wrapped = body.get("data").or_else(|| body.get("visit")).cloned();
  let record = wrapped.unwrap_or(body);
  Ok(serde_json::from_value(record)?)
}

fn error_message(body: &Value) -> Option<String> {
  ["error", "message"]
    .iter()
    .find_map(|field| body.get(*field).and_then(Value::as_str))
    .map(str::trim)
    .filter(|message| !message.is_empty())
    .map(String::from)
}
