use tracing::{debug, info, warn};

use crate::domain::element::quoted;
use crate::domain::{DialogSettings, Element, MessageId, NativeId, SongRecord, Vendor};
use crate::errors::CoreError;
use crate::ports::{ChatSession, HttpClient};
use crate::services::catalog::{CatalogService, SourceLookup};

const FETCH_FAILED: &str = "获取歌曲失败。";

/// Converts a vendor duration (`"3分45秒"`, `"3分"` or bare seconds) to whole seconds.
///
/// Anything that does not fit a `u32` is `None`, same as unparseable input.
pub fn interval_to_seconds(interval: &str) -> Option<u32> {
  let cleaned = interval.replace('秒', "");
  let parts: Vec<&str> = cleaned.split('分').map(str::trim).collect();
  match parts.as_slice() {
    [minutes, seconds] => {
      let seconds = if seconds.is_empty() { 0 } else { seconds.parse::<u32>().ok()? };
      minutes.parse::<u32>().ok()?.checked_mul(60)?.checked_add(seconds)
    }
    [seconds] => seconds.parse().ok(),
    _ => None,
  }
}

/// User-facing failure text, prefixed by the vendor's own message when present.
pub fn lookup_failure_text(vendor_message: Option<&str>) -> String {
  let Some(msg) = vendor_message.filter(|m| !m.is_empty()) else {
    return FETCH_FAILED.to_string();
  };
  let msg = msg.strip_suffix([',', '.', '，', '。']).unwrap_or(msg);
  format!("{msg}，{FETCH_FAILED}")
}

/// Picks the vendor and id for the second-stage lookup.
///
/// The source URL decides the vendor; the `vendor` recorded at search time is
/// only cross-checked.
pub fn resolve(record: &SongRecord) -> Option<(Vendor, &NativeId)> {
  let vendor = Vendor::from_source_url(&record.source_url)?;
  if vendor != record.vendor {
    warn!(recorded = %record.vendor, resolved = %vendor, url = %record.source_url, "vendor mismatch, using url");
  }
  Some((vendor, &record.native_id))
}

/// Resolves `record` to a playable source and sends it as audio.
///
/// Returns the reply to send when delivery ends without audio. The status
/// message is retracted (when `recall` is on) on every path once it exists,
/// including when sending the audio fails; that failure is returned after.
pub async fn deliver<C, S>(
  catalog: &CatalogService<C>,
  session: &S,
  settings: &DialogSettings,
  record: &SongRecord,
  quote: Option<&MessageId>,
) -> Result<Option<Vec<Element>>, CoreError>
where
  C: HttpClient,
  S: ChatSession + ?Sized,
{
  let Some((vendor, id)) = resolve(record) else {
    debug!(url = %record.source_url, "no vendor matches source url");
    return Ok(Some(quoted(quote, FETCH_FAILED)));
  };

  let status = session.send(quoted(quote, settings.generation_tip.clone())).await?.into_iter().next();

  let outcome = attempt(catalog, session, vendor, id).await;

  if settings.recall {
    if let Some(status) = &status {
      retract(session, status).await;
    }
  }

  match outcome? {
    Attempt::Sent => Ok(None),
    Attempt::Rejected(message) => Ok(Some(quoted(quote, lookup_failure_text(message.as_deref())))),
  }
}

enum Attempt {
  Sent,
  Rejected(Option<String>),
}

async fn attempt<C, S>(
  catalog: &CatalogService<C>,
  session: &S,
  vendor: Vendor,
  id: &NativeId,
) -> Result<Attempt, CoreError>
where
  C: HttpClient,
  S: ChatSession + ?Sized,
{
  match catalog.lookup_source(vendor, id).await? {
    SourceLookup::Found { src, interval } => {
      let duration = interval.as_deref().and_then(|i| {
        let secs = interval_to_seconds(i);
        if secs.is_none() {
          warn!(interval = i, "unparseable duration, sending audio without one");
        }
        secs
      });
      session.send(vec![Element::Audio { url: src, duration }]).await?;
      info!(%vendor, %id, ?duration, "song delivered");
      Ok(Attempt::Sent)
    }
    SourceLookup::Rejected { message } => Ok(Attempt::Rejected(message)),
  }
}

async fn retract<S>(session: &S, id: &MessageId)
where
  S: ChatSession + ?Sized,
{
  if let Err(err) = session.delete_message(id).await {
    warn!(message_id = %id, error = %err, "could not retract status message");
  }
}
