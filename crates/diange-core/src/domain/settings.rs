use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Ajustes del diálogo de selección, leídos de la sección `[music]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogSettings {
  /// Status text sent while the playable source is being resolved.
  #[serde(default = "default_generation_tip")]
  pub generation_tip: String,

  /// How long to wait for the user's pick, in milliseconds.
  #[serde(default = "default_wait_timeout")]
  pub wait_timeout: u64,

  /// Send the list as a rendered image instead of marked-up text.
  pub image_mode: bool,

  /// Dark theme for image lists.
  #[serde(default = "default_true")]
  pub dark_mode: bool,

  /// Exit tokens separated by `,` or `，`.
  #[serde(default = "default_exit_command")]
  pub exit_command: String,

  /// Append a line naming the exit tokens to the list.
  #[serde(default)]
  pub menu_exit_command_tip: bool,

  /// Delete the status message once delivery finishes.
  #[serde(default = "default_true")]
  pub recall: bool,
}

pub const MIN_WAIT_TIMEOUT_MS: u64 = 1000;

fn default_generation_tip() -> String {
  "生成语音中…".into()
}

fn default_wait_timeout() -> u64 {
  45_000
}

fn default_exit_command() -> String {
  "0, 不听了".into()
}

fn default_true() -> bool {
  true
}

impl DialogSettings {
  /// Defaults for every optional key. `image_mode` has none and must be chosen.
  pub fn with_image_mode(image_mode: bool) -> Self {
    Self {
      generation_tip: default_generation_tip(),
      wait_timeout: default_wait_timeout(),
      image_mode,
      dark_mode: true,
      exit_command: default_exit_command(),
      menu_exit_command_tip: false,
      recall: true,
    }
  }

  pub fn validate(&self) -> Result<(), CoreError> {
    if self.wait_timeout < MIN_WAIT_TIMEOUT_MS {
      return Err(CoreError::InvalidConfig(format!(
        "wait_timeout must be at least {MIN_WAIT_TIMEOUT_MS} ms, got {}",
        self.wait_timeout
      )));
    }
    Ok(())
  }

  /// Exit tokens, trimmed, in configured order. Blank entries are skipped.
  pub fn exit_tokens(&self) -> Vec<String> {
    self
      .exit_command
      .split([',', '，'])
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(str::to_string)
      .collect()
  }

  pub fn wait_timeout(&self) -> std::time::Duration {
    std::time::Duration::from_millis(self.wait_timeout)
  }
}
