//! Catalog query layer: one search per vendor, normalized into [`SongRecord`]s.
//!
//! The two vendors speak unrelated envelopes. Each has its own wire types and
//! one normalization function; nothing past this module looks at vendor shapes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::domain::{NativeId, SongList, SongRecord, Vendor};
use crate::errors::CoreError;
use crate::ports::HttpClient;

const QQ_SEARCH_ID: &str = "83397431192690042";
const QQ_PAGE_SIZE: u32 = 10;
const QQ_SONG_PAGE: &str = "https://y.qq.com/n/ryqq/songDetail/";

/// Base URLs of the vendor APIs. Overridable from the `[catalog]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEndpoints {
  /// Host of the song-by-name / song-by-id API used for NetEase search and
  /// for the playable-source lookup of both vendors.
  #[serde(default = "default_xzg_base")]
  pub xzg_base: String,

  /// QQ Music search endpoint (JSON-RPC style POST).
  #[serde(default = "default_qq_search")]
  pub qq_search: String,
}

fn default_xzg_base() -> String {
  "https://api.xingzhige.com".into()
}

fn default_qq_search() -> String {
  "https://u.y.qq.com/cgi-bin/musicu.fcg".into()
}

impl Default for CatalogEndpoints {
  fn default() -> Self {
    Self { xzg_base: default_xzg_base(), qq_search: default_qq_search() }
  }
}

impl CatalogEndpoints {
  fn xzg_url(&self, vendor: Vendor) -> String {
    let path = match vendor {
      Vendor::NetEase => "/API/NetEase_CloudMusic_new/",
      Vendor::QqMusic => "/API/QQmusicVIP/",
    };
    format!("{}{path}", self.xzg_base.trim_end_matches('/'))
  }
}

// -------- wire types: QQ Music search --------

#[derive(Debug, Deserialize)]
struct QqSearchResponse {
  code: i64,
  #[serde(default)]
  request: Option<QqRequest>,
}

#[derive(Debug, Deserialize)]
struct QqRequest {
  #[serde(default)]
  data: Option<QqRequestData>,
}

#[derive(Debug, Deserialize)]
struct QqRequestData {
  #[serde(default)]
  body: Option<QqBody>,
}

#[derive(Debug, Deserialize)]
struct QqBody {
  #[serde(default)]
  item_song: Vec<QqSong>,
}

#[derive(Debug, Deserialize)]
struct QqSong {
  id: i64,
  mid: String,
  title: String,
  #[serde(default)]
  album: Option<QqNamed>,
  #[serde(default)]
  singer: Vec<QqNamed>,
  #[serde(default)]
  action: Option<QqAction>,
}

#[derive(Debug, Deserialize)]
struct QqNamed {
  #[serde(default)]
  name: String,
}

#[derive(Debug, Deserialize)]
struct QqAction {
  #[serde(default)]
  msgdown: i64,
}

// -------- wire types: {code, msg, data} envelope --------

#[derive(Debug, Deserialize)]
struct XzgEnvelope {
  code: i64,
  #[serde(default)]
  msg: Option<String>,
  #[serde(default)]
  data: Value,
}

#[derive(Debug, Deserialize)]
struct XzgSong {
  songname: String,
  #[serde(default)]
  name: String,
  #[serde(default)]
  album: String,
  id: NativeId,
  songurl: String,
}

#[derive(Debug, Deserialize)]
struct XzgSource {
  src: String,
  #[serde(default)]
  interval: Option<Interval>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Interval {
  Seconds(u32),
  Text(String),
}

/// Result of the second-stage, by-id lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceLookup {
  /// Playable URL plus the vendor's duration string (`"3分45秒"` or `"222"`).
  Found { src: String, interval: Option<String> },
  /// The vendor answered with a non-success code.
  Rejected { message: Option<String> },
}

/// Removes the `<em>` highlighting QQ Music wraps around matched substrings.
pub fn strip_highlight(title: &str) -> String {
  title.replace("<em>", "").replace("</em>", "")
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, CoreError> {
  let parsed = match value {
    Value::String(raw) => serde_json::from_str(&raw),
    other => serde_json::from_value(other),
  };
  parsed.map_err(|e| CoreError::Decode(e.to_string()))
}

fn normalize_qq(song: QqSong) -> SongRecord {
  SongRecord {
    title: strip_highlight(&song.title),
    artist: song.singer.into_iter().map(|s| s.name).collect::<Vec<_>>().join("/"),
    album: song.album.map(|a| a.name).unwrap_or_default(),
    vendor: Vendor::QqMusic,
    native_id: NativeId::Numeric(song.id),
    download_blocked: song.action.is_some_and(|a| a.msgdown != 0),
    source_url: format!("{QQ_SONG_PAGE}{}", song.mid),
  }
}

fn normalize_netease(song: XzgSong) -> SongRecord {
  SongRecord {
    title: song.songname,
    artist: song.name,
    album: song.album,
    vendor: Vendor::NetEase,
    native_id: song.id,
    download_blocked: false,
    source_url: song.songurl,
  }
}

/// Cliente de los dos catálogos sobre un [`HttpClient`] inyectado.
pub struct CatalogService<C>
where
  C: HttpClient,
{
  http: C,
  endpoints: CatalogEndpoints,
}

impl<C> CatalogService<C>
where
  C: HttpClient,
{
  pub fn new(http: C, endpoints: CatalogEndpoints) -> Self {
    Self { http, endpoints }
  }

  /// Queries both vendors concurrently and merges the results.
  ///
  /// A vendor that fails for any reason contributes an empty segment; the
  /// failure is logged and never reaches the caller.
  pub async fn search(&self, keyword: &str) -> SongList {
    let (qq_music, netease) =
      futures::join!(self.search_vendor(Vendor::QqMusic, keyword), self.search_vendor(Vendor::NetEase, keyword));
    SongList::new(qq_music, netease)
  }

  async fn search_vendor(&self, vendor: Vendor, keyword: &str) -> Vec<SongRecord> {
    let result = match vendor {
      Vendor::QqMusic => self.search_qq(keyword).await,
      Vendor::NetEase => self.search_netease(keyword).await,
    };

    match result {
      Ok(records) => {
        debug!(%vendor, count = records.len(), "catalog search finished");
        records
      }
      Err(err) => {
        warn!(%vendor, error = %err, "catalog search failed, using empty result");
        Vec::new()
      }
    }
  }

  pub async fn search_qq(&self, keyword: &str) -> Result<Vec<SongRecord>, CoreError> {
    let body = json!({
      "comm": { "ct": 11, "cv": "1929" },
      "request": {
        "module": "music.search.SearchCgiService",
        "method": "DoSearchForQQMusicLite",
        "param": {
          "search_id": QQ_SEARCH_ID,
          "remoteplace": "search.android.keyboard",
          "query": keyword,
          "search_type": 0,
          "num_per_page": QQ_PAGE_SIZE,
          "page_num": 1,
          "highlight": 1,
          "nqc_flag": 0,
          "page_id": 1,
          "grp": 1
        }
      }
    });

    let raw = self.http.post_json(&self.endpoints.qq_search, &body).await?;
    let res: QqSearchResponse = decode(raw)?;
    if res.code != 0 {
      return Err(CoreError::VendorRejected { vendor: Vendor::QqMusic, code: res.code });
    }

    let songs = res.request.and_then(|r| r.data).and_then(|d| d.body).map(|b| b.item_song).unwrap_or_default();
    Ok(songs.into_iter().map(normalize_qq).collect())
  }

  pub async fn search_netease(&self, keyword: &str) -> Result<Vec<SongRecord>, CoreError> {
    let url = self.endpoints.xzg_url(Vendor::NetEase);
    let raw = self.http.get_json(&url, &[("name".to_string(), keyword.to_string())]).await?;
    let envelope: XzgEnvelope = decode(raw)?;
    if envelope.code != 0 {
      return Err(CoreError::VendorRejected { vendor: Vendor::NetEase, code: envelope.code });
    }

    let songs: Vec<XzgSong> = match envelope.data {
      Value::Null => Vec::new(),
      data => decode(data)?,
    };
    Ok(songs.into_iter().map(normalize_netease).collect())
  }

  /// Second-stage lookup of a playable source by native id.
  ///
  /// Transport and decode failures are errors; a non-success code is a
  /// [`SourceLookup::Rejected`] carrying the vendor's own message.
  pub async fn lookup_source(&self, vendor: Vendor, id: &NativeId) -> Result<SourceLookup, CoreError> {
    let url = self.endpoints.xzg_url(vendor);
    let raw = self.http.get_json(&url, &[("songid".to_string(), id.to_string())]).await?;
    let envelope: XzgEnvelope = decode(raw)?;

    if envelope.code != 0 {
      debug!(%vendor, code = envelope.code, msg = ?envelope.msg, "source lookup rejected");
      return Ok(SourceLookup::Rejected { message: envelope.msg.filter(|m| !m.is_empty()) });
    }

    let source: XzgSource = decode(envelope.data)?;
    let interval = source.interval.map(|i| match i {
      Interval::Seconds(s) => s.to_string(),
      Interval::Text(t) => t,
    });
    Ok(SourceLookup::Found { src: source.src, interval })
  }
}
