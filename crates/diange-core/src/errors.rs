// crates/diange-core/src/errors.rs
use thiserror::Error;

use crate::domain::Vendor;
use crate::ports::{HttpError, RenderError, SessionError};

/// Error genérico del núcleo de diange.
///
/// Benign endings of a dialog (timeout, exit, invalid index, vendor refusal)
/// are replies, not errors. Whatever reaches this type is fatal for the
/// invocation and should be reported by the host's top-level handler.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("http error: {0}")]
  Http(#[from] HttpError),

  #[error("decode error: {0}")]
  Decode(String),

  #[error("{vendor} rejected the request with code {code}")]
  VendorRejected { vendor: Vendor, code: i64 },

  #[error("session error: {0}")]
  Session(#[from] SessionError),

  #[error("render error: {0}")]
  Render(#[from] RenderError),

  #[error("image song lists require a page rendering service; enable one or turn image_mode off")]
  RendererUnavailable,

  #[error("invalid config: {0}")]
  InvalidConfig(String),
}
