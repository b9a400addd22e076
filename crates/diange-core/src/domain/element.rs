use serde::{Deserialize, Serialize};

/// Identificador de un mensaje dentro del host de mensajería.
///
/// The core never inspects it; it is only quoted back or handed to
/// `delete_message`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }
}

impl std::fmt::Display for MessageId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

/// A single piece of an outbound or inbound chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
  /// Reply reference to an earlier message.
  Quote(MessageId),
  /// Plain text, sent verbatim.
  Text(String),
  /// Host markup: `<b>`, `<s>` and `<br/>` are the only tags produced.
  Markup(String),
  Image { data: Vec<u8>, mime: String },
  /// Playable audio; `duration` in whole seconds when known.
  Audio { url: String, duration: Option<u32> },
  /// Countdown placeholder the host renders as a localized duration.
  Time { ms: u64 },
}

impl Element {
  pub fn text(s: impl Into<String>) -> Self {
    Element::Text(s.into())
  }

  pub fn markup(s: impl Into<String>) -> Self {
    Element::Markup(s.into())
  }
}

/// Collapses a message down to its plain-text elements, in order.
///
/// Quotes, images and markup are dropped; what is left is what the user typed.
pub fn plain_text(elements: &[Element]) -> String {
  elements
    .iter()
    .filter_map(|e| match e {
      Element::Text(t) => Some(t.as_str()),
      _ => None,
    })
    .collect()
}

/// Prepends a quote of `quote` when one is known.
pub fn quoted(quote: Option<&MessageId>, body: impl Into<String>) -> Vec<Element> {
  let mut out = Vec::with_capacity(2);
  if let Some(id) = quote {
    out.push(Element::Quote(id.clone()));
  }
  out.push(Element::Text(body.into()));
  out
}
