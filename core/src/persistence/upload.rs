// stepform/src/persistence/upload.rs

//! File uploads for the files step. Descriptors returned by the upload
//! endpoint are stored in the form as-is; the wizard never interprets them.

use crate::config::WizardConfig;
use crate::error::{WizardError, WizardResult};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{event, instrument, Level};

/// A file picked by the user and not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
  pub name: String,
  pub content_type: Option<String>,
  pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
  pub id: String,
  pub url: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub format: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub width: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub height: Option<u32>,
  /// Seconds, for audio and video.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub duration: Option<f64>,
}

#[async_trait]
pub trait FileUploader: Send + Sync {
  async fn upload(&self, file: &PendingFile, folder: &str) -> WizardResult<FileDescriptor>;
}

/// Multipart `POST {base}/uploads`, one request per file so a failure only
/// affects that file.
#[derive(Debug, Clone)]
pub struct HttpFileUploader {
  client: Client,
  base_url: String,
}

impl HttpFileUploader {
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
}

#[async_trait]
impl FileUploader for HttpFileUploader {
  #[instrument(name = "HttpFileUploader::upload", skip(self, file), fields(file = %file.name, bytes = file.bytes.len()), err(Display))]
  async fn upload(&self, file: &PendingFile, folder: &str) -> WizardResult<FileDescriptor> {
    let mut part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
    if let Some(content_type) = &file.content_type {
      part = part.mime_str(content_type)?;
    }
    let form = Form::new().text("folder", folder.to_string()).part("file", part);

    let url = format!("{}/uploads", self.base_url);
    let response = self.client.post(&url).multipart(form).send().await?;
    let status = response.status();
    let text = response.text().await?;
    let body: Option<Value> = serde_json::from_str(&text).ok();

    if !status.is_success() {
      let message = body
        .as_ref()
        .and_then(|b| b.get("error").or_else(|| b.get("message")))
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| format!("upload endpoint answered HTTP {}", status.as_u16()));
      event!(Level::WARN, http_status = status.as_u16(), %message, "Upload rejected.");
      return Err(WizardError::Upload {
        file: file.name.clone(),
        message,
      });
    }

    // Either a bare descriptor or `{ "files": [descriptor] }`.
    let body = body.unwrap_or(Value::Null);
    let listed = body
      .get("files")
      .and_then(Value::as_array)
      .map(|files| files.first().cloned().unwrap_or(Value::Null));
    let descriptor = listed.unwrap_or(body);
    serde_json::from_value(descriptor).map_err(|e| WizardError::Upload {
      file: file.name.clone(),
      message: format!("unexpected upload response: {}", e),
    })
  }
}
