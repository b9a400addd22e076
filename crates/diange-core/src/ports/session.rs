use crate::domain::{Element, MessageId};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
  #[error("send failed: {0}")]
  Send(String),

  #[error("receive failed: {0}")]
  Receive(String),

  #[error("delete failed: {0}")]
  Delete(String),

  #[error("session closed")]
  Closed,
}

/// Mensaje entrante del mismo contexto interactivo.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
  pub id: Option<MessageId>,
  pub elements: Vec<Element>,
}

/// Port to the messaging host, scoped to one command invocation.
///
/// `next_reply` resolves with the next message from the same user and
/// channel. Dropping the returned future must unregister the listener, so a
/// reply arriving after the caller gave up is not consumed.
#[async_trait::async_trait]
pub trait ChatSession: Send + Sync {
  /// Id of the message that invoked the command, if the host has one.
  fn message_id(&self) -> Option<MessageId>;

  /// Sends one message and returns the ids the host assigned, in order.
  async fn send(&self, elements: Vec<Element>) -> Result<Vec<MessageId>, SessionError>;

  async fn delete_message(&self, id: &MessageId) -> Result<(), SessionError>;

  async fn next_reply(&self) -> Result<InboundMessage, SessionError>;
}
