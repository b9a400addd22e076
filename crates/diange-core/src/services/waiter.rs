use std::time::Duration;

use tracing::debug;

use crate::domain::element::plain_text;
use crate::domain::MessageId;
use crate::errors::CoreError;
use crate::ports::ChatSession;

/// How the selection wait ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
  TimedOut,
  /// The reply was one of the exit tokens.
  Exit,
  /// Not a positive integer within the list.
  Invalid,
  /// A 1-based position inside the list.
  Pick(usize),
}

/// Classifies one reply against the exit tokens and the list length.
///
/// The reply is trimmed first. Exit tokens win over numbers, so a `0` token
/// exits rather than being an invalid index.
pub fn classify(input: &str, exit_tokens: &[String], list_len: usize) -> Selection {
  let input = input.trim();
  if exit_tokens.iter().any(|t| t == input) {
    return Selection::Exit;
  }

  // Decimal integers only: "+3" and "03" pick, "3.0" and "1e0" are invalid.
  match input.parse::<usize>() {
    Ok(n) if (1..=list_len).contains(&n) => Selection::Pick(n),
    _ => Selection::Invalid,
  }
}

/// Waits for exactly one reply, or for `timeout` to elapse.
///
/// Whichever happens first wins; the pending reply listener is dropped on
/// timeout so a late reply is never handled. `quote` is moved to the reply's
/// id when it carries one.
pub async fn await_selection<S>(
  session: &S,
  timeout: Duration,
  exit_tokens: &[String],
  list_len: usize,
  quote: &mut Option<MessageId>,
) -> Result<Selection, CoreError>
where
  S: ChatSession + ?Sized,
{
  let reply = match tokio::time::timeout(timeout, session.next_reply()).await {
    Ok(reply) => reply?,
    Err(_) => {
      debug!(timeout_ms = timeout.as_millis() as u64, "selection timed out");
      return Ok(Selection::TimedOut);
    }
  };

  if let Some(id) = reply.id {
    *quote = Some(id);
  }

  let input = plain_text(&reply.elements);
  let selection = classify(&input, exit_tokens, list_len);
  debug!(input = %input, ?selection, "selection received");
  Ok(selection)
}
