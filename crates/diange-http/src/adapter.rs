use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;

use diange_core::ports::http::{HttpClient, HttpError};

use crate::config::HttpConfig;

/// Implementación de `HttpClient` sobre `reqwest`.
///
/// Bodies are read as text and parsed here; a body that is not JSON is handed
/// back as `Value::String` so the catalog layer can decide what to do with it.
#[derive(Clone)]
pub struct ReqwestHttpClient {
  client: reqwest::Client,
}

impl ReqwestHttpClient {
  pub fn new(cfg: &HttpConfig) -> Result<Self, HttpError> {
    let client = reqwest::Client::builder()
      .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
      .timeout(Duration::from_secs(cfg.request_timeout_secs))
      .user_agent(cfg.user_agent.clone())
      .build()
      .map_err(|e| HttpError::Transport(e.to_string()))?;
    Ok(Self { client })
  }

  async fn read_body(response: reqwest::Response) -> Result<Value, HttpError> {
    let status = response.status();
    let url = response.url().to_string();
    if !status.is_success() {
      return Err(HttpError::Status { status: status.as_u16(), url });
    }

    let text = response.text().await.map_err(|e| HttpError::Body(e.to_string()))?;
    trace!(%url, bytes = text.len(), "response body read");
    Ok(parse_body(text))
  }
}

fn parse_body(text: String) -> Value {
  serde_json::from_str(&text).unwrap_or(Value::String(text))
}

fn map_request_error(err: reqwest::Error) -> HttpError {
  match err.status() {
    Some(status) => HttpError::Status {
      status: status.as_u16(),
      url: err.url().map(|u| u.to_string()).unwrap_or_default(),
    },
    None => HttpError::Transport(err.to_string()),
  }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
  async fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<Value, HttpError> {
    let response = self.client.get(url).query(query).send().await.map_err(map_request_error)?;
    Self::read_body(response).await
  }

  async fn post_json(&self, url: &str, body: &Value) -> Result<Value, HttpError> {
    let response = self.client.post(url).json(body).send().await.map_err(map_request_error)?;
    Self::read_body(response).await
  }
}
