use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::Mutex;

use diange_core::domain::{Element, MessageId};
use diange_core::ports::{ChatSession, InboundMessage, SessionError};

/// A `ChatSession` over a line-oriented console.
///
/// Every outbound message gets a sequential id and is printed as one block;
/// every input line is one inbound reply. Images are written to `image_dir`
/// and referenced by path.
pub struct ConsoleSession<R, W> {
  input: Mutex<Lines<R>>,
  output: Mutex<W>,
  image_dir: PathBuf,
  next_id: AtomicU64,
}

impl<R, W> ConsoleSession<R, W>
where
  R: AsyncBufRead + Unpin + Send,
  W: AsyncWrite + Unpin + Send,
{
  pub fn new(input: R, output: W, image_dir: PathBuf) -> Self {
    Self { input: Mutex::new(input.lines()), output: Mutex::new(output), image_dir, next_id: AtomicU64::new(1) }
  }

  pub fn into_output(self) -> W {
    self.output.into_inner()
  }

  fn allocate_id(&self) -> MessageId {
    MessageId::new(self.next_id.fetch_add(1, Ordering::SeqCst).to_string())
  }

  async fn write_block(&self, block: &str) -> Result<(), SessionError> {
    let mut out = self.output.lock().await;
    out.write_all(block.as_bytes()).await.map_err(|e| SessionError::Send(e.to_string()))?;
    out.flush().await.map_err(|e| SessionError::Send(e.to_string()))
  }
}

/// Host markup to console text: line breaks kept, bold dropped, strikethrough as `~~`.
pub fn markup_to_plain(markup: &str) -> String {
  markup
    .replace("<br/>", "\n")
    .replace("<b>", "")
    .replace("</b>", "")
    .replace("<s>", "~~")
    .replace("</s>", "~~")
    .replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&amp;", "&")
}

/// Localized countdown text for a `Time` element.
pub fn format_time(ms: u64) -> String {
  let secs = ms / 1000;
  match (secs / 60, secs % 60) {
    (0, s) => format!("{s} 秒"),
    (m, 0) => format!("{m} 分钟"),
    (m, s) => format!("{m} 分钟 {s} 秒"),
  }
}

#[async_trait]
impl<R, W> ChatSession for ConsoleSession<R, W>
where
  R: AsyncBufRead + Unpin + Send,
  W: AsyncWrite + Unpin + Send,
{
  fn message_id(&self) -> Option<MessageId> {
    None
  }

  async fn send(&self, elements: Vec<Element>) -> Result<Vec<MessageId>, SessionError> {
    let id = self.allocate_id();
    let mut block = format!("#{id} ");

    for element in elements {
      match element {
        Element::Quote(q) => block.push_str(&format!("[回复 #{q}] ")),
        Element::Text(t) => block.push_str(&t),
        Element::Markup(m) => block.push_str(&markup_to_plain(&m)),
        Element::Time { ms } => block.push_str(&format_time(ms)),
        Element::Audio { url, duration } => match duration {
          Some(secs) => block.push_str(&format!("[语音 {secs}s] {url}")),
          None => block.push_str(&format!("[语音] {url}")),
        },
        Element::Image { data, mime } => {
          let ext = mime.strip_prefix("image/").unwrap_or("bin");
          let path = self.image_dir.join(format!("message-{id}.{ext}"));
          tokio::fs::write(&path, &data).await.map_err(|e| SessionError::Send(e.to_string()))?;
          block.push_str(&format!("[图片] {}\n", path.display()));
        }
      }
    }
    block.push('\n');

    self.write_block(&block).await?;
    Ok(vec![id])
  }

  async fn delete_message(&self, id: &MessageId) -> Result<(), SessionError> {
    self.write_block(&format!("(#{id} 已撤回)\n")).await.map_err(|e| SessionError::Delete(e.to_string()))
  }

  async fn next_reply(&self) -> Result<InboundMessage, SessionError> {
    // `next_line` is cancel safe: a timeout dropping this future loses no input.
    let line = self
      .input
      .lock()
      .await
      .next_line()
      .await
      .map_err(|e| SessionError::Receive(e.to_string()))?
      .ok_or(SessionError::Closed)?;

    Ok(InboundMessage { id: Some(self.allocate_id()), elements: vec![Element::Text(line)] })
  }
}
