use serde::{Deserialize, Serialize};

/// Catálogo externo del que procede una canción.
///
/// Declaration order is list order: QQ Music results always come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vendor {
  QqMusic,
  NetEase,
}

impl Vendor {
  pub const ALL: [Vendor; 2] = [Vendor::QqMusic, Vendor::NetEase];

  /// Label shown to users at the head of each list segment.
  pub fn label(self) -> &'static str {
    match self {
      Vendor::QqMusic => "QQ Music",
      Vendor::NetEase => "NetEase Music",
    }
  }

  /// Fragment of `source_url` that identifies this vendor at resolution time.
  pub fn domain_fragment(self) -> &'static str {
    match self {
      Vendor::QqMusic => ".qq.com/",
      Vendor::NetEase => ".163.com/",
    }
  }

  /// Classifies a reference URL by domain. `None` when no vendor matches.
  pub fn from_source_url(url: &str) -> Option<Vendor> {
    // NetEase is probed first; a URL carrying both fragments is not expected.
    [Vendor::NetEase, Vendor::QqMusic].into_iter().find(|v| url.contains(v.domain_fragment()))
  }
}

impl std::fmt::Display for Vendor {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

/// Vendor-specific song identifier, numeric or textual depending on the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NativeId {
  Numeric(i64),
  Text(String),
}

impl std::fmt::Display for NativeId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      NativeId::Numeric(n) => write!(f, "{n}"),
      NativeId::Text(s) => f.write_str(s),
    }
  }
}

/// Resultado normalizado de una búsqueda en cualquiera de los catálogos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
  pub title: String,
  pub artist: String,
  pub album: String,
  /// Catalog the record came from.
  pub vendor: Vendor,
  /// Id to use for the second-stage lookup against `vendor`.
  pub native_id: NativeId,
  /// Flagged by the vendor as not obtainable. Only affects rendering.
  pub download_blocked: bool,
  /// Song page URL. Its domain decides the vendor at resolution time.
  pub source_url: String,
}

/// One vendor's slice of a [`SongList`], with its offset in the global numbering.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
  pub vendor: Vendor,
  /// Number of entries preceding this segment.
  pub start: usize,
  pub records: &'a [SongRecord],
}

/// Lista combinada: QQ Music first, NetEase second.
///
/// Positions shown to the user are 1-based over the concatenation, and the
/// same numbering is used to look a selection back up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongList {
  qq_music: Vec<SongRecord>,
  netease: Vec<SongRecord>,
}

impl SongList {
  pub fn new(qq_music: Vec<SongRecord>, netease: Vec<SongRecord>) -> Self {
    Self { qq_music, netease }
  }

  pub fn len(&self) -> usize {
    self.qq_music.len() + self.netease.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn segment(&self, vendor: Vendor) -> &[SongRecord] {
    match vendor {
      Vendor::QqMusic => &self.qq_music,
      Vendor::NetEase => &self.netease,
    }
  }

  /// All segments in list order, empty ones included.
  pub fn segments(&self) -> impl Iterator<Item = Segment<'_>> {
    let mut start = 0;
    Vendor::ALL.into_iter().map(move |vendor| {
      let records = self.segment(vendor);
      let seg = Segment { vendor, start, records };
      start += records.len();
      seg
    })
  }

  /// Looks up a 1-based position. `0` and anything past the end yield `None`.
  pub fn get(&self, position: usize) -> Option<&SongRecord> {
    let index = position.checked_sub(1)?;
    match index.checked_sub(self.qq_music.len()) {
      None => self.qq_music.get(index),
      Some(rest) => self.netease.get(rest),
    }
  }
}
