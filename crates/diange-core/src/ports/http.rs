use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
  #[error("transport error: {0}")]
  Transport(String),

  #[error("unexpected status {status}: {url}")]
  Status { status: u16, url: String },

  #[error("body error: {0}")]
  Body(String),
}

/// Port de cliente HTTP para las APIs de los catálogos.
///
/// Bodies that parse as JSON come back parsed. Anything else comes back as
/// `Value::String` holding the raw text, since some vendors send JSON with
/// a non-JSON content type; callers re-parse those.
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
  async fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<Value, HttpError>;
  async fn post_json(&self, url: &str, body: &Value) -> Result<Value, HttpError>;
}
