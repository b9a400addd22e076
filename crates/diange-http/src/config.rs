use serde::{Deserialize, Serialize};

/// Ajustes del cliente HTTP, sección `[http]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
  /// Connect timeout in seconds.
  #[serde(default = "default_connect_timeout")]
  pub connect_timeout_secs: u64,

  /// Whole-request timeout in seconds.
  #[serde(default = "default_request_timeout")]
  pub request_timeout_secs: u64,

  #[serde(default = "default_user_agent")]
  pub user_agent: String,
}

fn default_connect_timeout() -> u64 {
  5
}

fn default_request_timeout() -> u64 {
  15
}

fn default_user_agent() -> String {
  concat!("diange/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for HttpConfig {
  fn default() -> Self {
    Self {
      connect_timeout_secs: default_connect_timeout(),
      request_timeout_secs: default_request_timeout(),
      user_agent: default_user_agent(),
    }
  }
}
