//! In-memory fakes of the ports, shared by the service tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::domain::{Element, MessageId};
use crate::ports::{ChatSession, HttpClient, HttpError, InboundMessage, PageRenderer, RenderError, SessionError};

#[derive(Debug, Clone)]
pub(crate) struct HttpCall {
  pub method: &'static str,
  pub url: String,
  pub query: Vec<(String, String)>,
  pub body: Option<Value>,
}

type Handler = dyn Fn(&HttpCall) -> Result<Value, HttpError> + Send + Sync;

/// Scripted HTTP client. Clones share the call log.
#[derive(Clone)]
pub(crate) struct FakeHttp {
  handler: Arc<Handler>,
  calls: Arc<Mutex<Vec<HttpCall>>>,
}

impl FakeHttp {
  pub fn new(handler: impl Fn(&HttpCall) -> Result<Value, HttpError> + Send + Sync + 'static) -> Self {
    Self { handler: Arc::new(handler), calls: Arc::new(Mutex::new(Vec::new())) }
  }

  pub fn calls(&self) -> Vec<HttpCall> {
    self.calls.lock().unwrap().clone()
  }

  fn record(&self, call: HttpCall) -> Result<Value, HttpError> {
    let result = (self.handler)(&call);
    self.calls.lock().unwrap().push(call);
    result
  }
}

#[async_trait::async_trait]
impl HttpClient for FakeHttp {
  async fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<Value, HttpError> {
    self.record(HttpCall { method: "GET", url: url.to_string(), query: query.to_vec(), body: None })
  }

  async fn post_json(&self, url: &str, body: &Value) -> Result<Value, HttpError> {
    self.record(HttpCall { method: "POST", url: url.to_string(), query: Vec::new(), body: Some(body.clone()) })
  }
}

/// Chat session that replays queued replies and records everything sent.
///
/// With no reply queued, `next_reply` never resolves, like a silent user.
pub(crate) struct FakeSession {
  invoking: Option<MessageId>,
  next_id: AtomicU64,
  replies: Mutex<VecDeque<InboundMessage>>,
  sent: Mutex<Vec<(MessageId, Vec<Element>)>>,
  deleted: Mutex<Vec<MessageId>>,
  fail_audio: bool,
}

impl FakeSession {
  pub fn new() -> Self {
    Self {
      invoking: Some(MessageId::new("cmd")),
      next_id: AtomicU64::new(1),
      replies: Mutex::new(VecDeque::new()),
      sent: Mutex::new(Vec::new()),
      deleted: Mutex::new(Vec::new()),
      fail_audio: false,
    }
  }

  pub fn failing_audio(mut self) -> Self {
    self.fail_audio = true;
    self
  }

  pub fn reply(self, id: &str, text: &str) -> Self {
    self
      .replies
      .lock()
      .unwrap()
      .push_back(InboundMessage { id: Some(MessageId::new(id)), elements: vec![Element::text(text)] });
    self
  }

  pub fn sent(&self) -> Vec<(MessageId, Vec<Element>)> {
    self.sent.lock().unwrap().clone()
  }

  pub fn deleted(&self) -> Vec<MessageId> {
    self.deleted.lock().unwrap().clone()
  }
}

#[async_trait::async_trait]
impl ChatSession for FakeSession {
  fn message_id(&self) -> Option<MessageId> {
    self.invoking.clone()
  }

  async fn send(&self, elements: Vec<Element>) -> Result<Vec<MessageId>, SessionError> {
    if self.fail_audio && elements.iter().any(|e| matches!(e, Element::Audio { .. })) {
      return Err(SessionError::Send("audio rejected".into()));
    }
    let id = MessageId::new(format!("m{}", self.next_id.fetch_add(1, Ordering::SeqCst)));
    self.sent.lock().unwrap().push((id.clone(), elements));
    Ok(vec![id])
  }

  async fn delete_message(&self, id: &MessageId) -> Result<(), SessionError> {
    self.deleted.lock().unwrap().push(id.clone());
    Ok(())
  }

  async fn next_reply(&self) -> Result<InboundMessage, SessionError> {
    let queued = self.replies.lock().unwrap().pop_front();
    match queued {
      Some(msg) => Ok(msg),
      None => futures::future::pending().await,
    }
  }
}

pub(crate) struct FakeRenderer {
  pub pages: Mutex<Vec<(String, String)>>,
  fail: bool,
}

impl FakeRenderer {
  pub const PNG: &'static [u8] = b"\x89PNG fake";

  pub fn new() -> Self {
    Self { pages: Mutex::new(Vec::new()), fail: false }
  }

  /// Every screenshot fails as if the list node never appeared.
  pub fn failing() -> Self {
    Self { pages: Mutex::new(Vec::new()), fail: true }
  }
}

#[async_trait::async_trait]
impl PageRenderer for FakeRenderer {
  async fn screenshot_element(&self, html: &str, selector: &str) -> Result<Vec<u8>, RenderError> {
    self.pages.lock().unwrap().push((html.to_string(), selector.to_string()));
    if self.fail {
      return Err(RenderError::ElementNotFound(selector.to_string()));
    }
    Ok(Self::PNG.to_vec())
  }
}

/// QQ Music search body; entries are `(title, id, mid, msgdown)`.
pub(crate) fn qq_search_body(entries: &[(&str, i64, &str, i64)]) -> Value {
  let items: Vec<Value> = entries
    .iter()
    .map(|(title, id, mid, msgdown)| {
      json!({
        "id": id,
        "mid": mid,
        "name": title,
        "title": title,
        "album": { "name": "叶惠美" },
        "singer": [{ "name": "周杰伦" }, { "name": "合唱" }],
        "action": { "msgdown": msgdown }
      })
    })
    .collect();
  json!({
    "code": 0,
    "ts": 0,
    "start_ts": 0,
    "traceid": "t",
    "request": { "code": 0, "data": { "body": { "item_song": items }, "code": 0, "ver": 1 } }
  })
}

/// NetEase search body; entries are `(songname, id)`.
pub(crate) fn netease_search_body(entries: &[(&str, i64)]) -> Value {
  let data: Vec<Value> = entries
    .iter()
    .map(|(name, id)| {
      json!({
        "songname": name,
        "name": "Beyond",
        "album": "乐与怒",
        "id": id,
        "songurl": format!("https://music.163.com/#/song?id={id}")
      })
    })
    .collect();
  json!({ "code": 0, "msg": "", "data": data })
}

pub(crate) fn source_body(src: &str, interval: Value) -> Value {
  json!({ "code": 0, "msg": "", "data": { "src": src, "interval": interval, "songname": "x" } })
}
