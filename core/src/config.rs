// stepform/src/config.rs

use crate::error::{WizardError, WizardResult};
use crate::tracker::DEFAULT_DEBOUNCE;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WizardConfig {
  /// Base URL of the visit API (`{base}/visits`, `{base}/uploads`).
  pub api_base_url: String,
  /// Locale sent with every saved visit.
  pub locale: String,
  pub debounce: Duration,
  /// Allow step-indicator jumps without completing earlier steps.
  pub free_navigation: bool,
  /// Destination-folder hint sent with uploads.
  pub upload_folder: String,
  pub request_timeout: Duration,
}

impl Default for WizardConfig {
  fn default() -> Self {
    Self {
      api_base_url: "http://127.0.0.1:3000/api".to_string(),
      locale: "es".to_string(),
      debounce: DEFAULT_DEBOUNCE,
      free_navigation: true,
      upload_folder: "visits".to_string(),
      request_timeout: Duration::from_secs(30),
    }
  }
}

impl WizardConfig {
  /// Loads `STEPFORM_*` variables, reading a `.env` file first if present.
  pub fn from_env() -> WizardResult<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from an arbitrary variable source; unset
  /// variables keep their defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> WizardResult<Self> {
    let defaults = Self::default();

    let api_base_url = lookup("STEPFORM_API_URL")
      .map(|url| url.trim_end_matches('/').to_string())
      .unwrap_or(defaults.api_base_url);
    let locale = lookup("STEPFORM_LOCALE").unwrap_or(defaults.locale);
    let debounce = match lookup("STEPFORM_DEBOUNCE_MS") {
      Some(raw) => Duration::from_millis(
        raw
          .parse::<u64>()
          .map_err(|e| WizardError::Config(format!("Invalid STEPFORM_DEBOUNCE_MS: {}", e)))?,
      ),
      None => defaults.debounce,
    };
    let free_navigation = match lookup("STEPFORM_FREE_NAVIGATION") {
      Some(raw) => raw
        .parse::<bool>()
        .map_err(|e| WizardError::Config(format!("Invalid STEPFORM_FREE_NAVIGATION value: {}", e)))?,
      None => defaults.free_navigation,
    };
    let upload_folder = lookup("STEPFORM_UPLOAD_FOLDER").unwrap_or(defaults.upload_folder);
    let request_timeout = match lookup("STEPFORM_REQUEST_TIMEOUT_SECS") {
      Some(raw) => Duration::from_secs(
        raw
          .parse::<u64>()
          .map_err(|e| WizardError::Config(format!("Invalid STEPFORM_REQUEST_TIMEOUT_SECS: {}", e)))?,
      ),
      None => defaults.request_timeout,
    };

    tracing::info!("Wizard configuration loaded successfully.");

    Ok(Self {
      api_base_url,
      locale,
      debounce,
      free_navigation,
      upload_folder,
      request_timeout,
    })
  }
}
