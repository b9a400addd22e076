#[derive(Debug, thiserror::Error)]
pub enum RenderError {
  #[error("page error: {0}")]
  Page(String),

  #[error("element not found: {0}")]
  ElementNotFound(String),
}

/// Port que abstrae un navegador headless.
///
/// Loads `html` into a fresh page and returns a PNG of the element matched by
/// `selector`, cropped to that element.
#[async_trait::async_trait]
pub trait PageRenderer: Send + Sync {
  async fn screenshot_element(&self, html: &str, selector: &str) -> Result<Vec<u8>, RenderError>;
}
