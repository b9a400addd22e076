use crate::domain::{DialogSettings, Element, MessageId, SongList, SongRecord, Vendor};
use crate::errors::CoreError;
use crate::ports::PageRenderer;

/// DOM node the image renderer crops to.
pub const LIST_SELECTOR: &str = "#song-list";

const UNAVAILABLE: &str = "无法获取歌曲列表";

fn escape(s: &str) -> String {
  s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn format_entry(position: usize, record: &SongRecord) -> String {
  let item = format!("{position}. {} -- {}", escape(&record.title), escape(&record.artist));
  if record.download_blocked { format!("<s>{item}</s>") } else { item }
}

/// One vendor segment: bold label, then one entry per line numbered from `start + 1`.
pub fn format_segment(vendor: Vendor, records: &[SongRecord], start: usize) -> String {
  if records.is_empty() {
    return format!("<b>{}</b>: {UNAVAILABLE}", vendor.label());
  }

  let entries: Vec<String> =
    records.iter().enumerate().map(|(i, record)| format_entry(start + i + 1, record)).collect();
  format!("<b>{}</b>:<br/>{}", vendor.label(), entries.join("<br/>"))
}

/// Whole list as host markup, segments separated by a blank line.
pub fn format_song_list(list: &SongList) -> String {
  list
    .segments()
    .map(|seg| format_segment(seg.vendor, seg.records, seg.start))
    .collect::<Vec<_>>()
    .join("<br/><br/>")
}

/// Optional line naming the exit tokens, already followed by a blank line.
pub fn exit_tip(settings: &DialogSettings) -> String {
  if !settings.menu_exit_command_tip {
    return String::new();
  }
  format!("退出选择请发[{}]中的任意内容<br/><br/>", settings.exit_tokens().join(","))
}

/// Minimal page holding the list, themed for the screenshot.
pub fn list_page_html(list_markup: &str, dark_mode: bool) -> String {
  let (text, background) = if dark_mode { (255, 0) } else { (0, 255) };
  format!(
    r#"<!DOCTYPE html>
<html lang="zh">
  <head>
    <title>music</title>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <style>
      body {{
        margin: 0;
        font-family: PingFang SC, Hiragino Sans GB, Microsoft YaHei, SimSun, sans-serif;
        font-size: 16px;
        background: rgb({background},{background},{background});
        color: rgb({text},{text},{text});
        min-height: 100vh;
      }}
      #song-list {{
        padding: 20px;
        display: inline-block;
        max-width: 100%;
        white-space: nowrap;
        transform: scale(0.85);
      }}
      s {{
        text-decoration-thickness: 1.5px;
      }}
    </style>
  </head>
  <body>
    <div id="song-list">{list_markup}</div>
  </body>
</html>
"#
  )
}

fn push_quote(out: &mut Vec<Element>, quote: Option<&MessageId>) {
  if let Some(id) = quote {
    out.push(Element::Quote(id.clone()));
  }
}

/// Text menu: list markup, optional exit tip and the countdown prompt.
pub fn text_menu(quote: Option<&MessageId>, list_markup: &str, tip: &str, timeout_ms: u64) -> Vec<Element> {
  let mut out = Vec::with_capacity(4);
  push_quote(&mut out, quote);
  out.push(Element::markup(format!("{list_markup}<br/><br/>{tip}请在 ")));
  out.push(Element::Time { ms: timeout_ms });
  out.push(Element::markup("内，<br/>输入歌曲对应的序号"));
  out
}

/// Image menu: the rendered list followed by the same prompt as plain text.
pub fn image_menu(quote: Option<&MessageId>, png: Vec<u8>, tip: &str, timeout_ms: u64) -> Vec<Element> {
  let mut out = Vec::with_capacity(6);
  push_quote(&mut out, quote);
  out.push(Element::Image { data: png, mime: "image/png".into() });
  out.push(Element::text(format!("{}请在 ", tip.replace("<br/>", "\n"))));
  out.push(Element::Time { ms: timeout_ms });
  out.push(Element::text("内，\n"));
  out.push(Element::text("输入歌曲对应的序号"));
  out
}

/// Builds the menu message in the configured mode.
///
/// Image mode without a renderer fails here, before anything is sent.
pub async fn present(
  settings: &DialogSettings,
  renderer: Option<&dyn PageRenderer>,
  list: &SongList,
  quote: Option<&MessageId>,
) -> Result<Vec<Element>, CoreError> {
  let markup = format_song_list(list);
  let tip = exit_tip(settings);

  if !settings.image_mode {
    return Ok(text_menu(quote, &markup, &tip, settings.wait_timeout));
  }

  let renderer = renderer.ok_or(CoreError::RendererUnavailable)?;
  let html = list_page_html(&markup, settings.dark_mode);
  let png = renderer.screenshot_element(&html, LIST_SELECTOR).await?;
  Ok(image_menu(quote, png, &tip, settings.wait_timeout))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::song::tests::record;
  use crate::ports::RenderError;
  use crate::testing::FakeRenderer;

  fn two_qq_list() -> SongList {
    SongList::new(vec![record(Vendor::QqMusic, "晴天", 1), record(Vendor::QqMusic, "七里香", 2)], vec![])
  }

  #[test]
  fn empty_segment_reports_unavailable() {
    assert_eq!(format_segment(Vendor::NetEase, &[], 2), "<b>NetEase Music</b>: 无法获取歌曲列表");
  }

  #[test]
  fn entries_numbered_from_offset_and_struck_when_blocked() {
    let mut blocked = record(Vendor::NetEase, "海阔天空", 3);
    blocked.download_blocked = true;
    let records = vec![record(Vendor::NetEase, "光辉岁月", 4), blocked];

    assert_eq!(
      format_segment(Vendor::NetEase, &records, 2),
      "<b>NetEase Music</b>:<br/>3. 光辉岁月 -- Artista<br/><s>4. 海阔天空 -- Artista</s>"
    );
  }

  #[test]
  fn list_keeps_vendor_order_and_blank_line() {
    let markup = format_song_list(&two_qq_list());
    assert_eq!(
      markup,
      "<b>QQ Music</b>:<br/>1. 晴天 -- Artista<br/>2. 七里香 -- Artista<br/><br/><b>NetEase Music</b>: 无法获取歌曲列表"
    );
  }

  #[test]
  fn titles_are_escaped() {
    let rec = record(Vendor::QqMusic, "a<b>&c", 1);
    assert_eq!(format_entry(1, &rec), "1. a&lt;b&gt;&amp;c -- Artista");
  }

  #[test]
  fn exit_tip_lists_tokens_when_enabled() {
    let mut settings = DialogSettings::with_image_mode(false);
    assert_eq!(exit_tip(&settings), "");
    settings.menu_exit_command_tip = true;
    assert_eq!(exit_tip(&settings), "退出选择请发[0,不听了]中的任意内容<br/><br/>");
  }

  #[test]
  fn html_theme_follows_dark_mode() {
    let dark = list_page_html("x", true);
    assert!(dark.contains("background: rgb(0,0,0)"));
    assert!(dark.contains(r#"<div id="song-list">x</div>"#));
    assert!(list_page_html("x", false).contains("color: rgb(0,0,0)"));
  }

  #[tokio::test]
  async fn text_mode_builds_markup_message() {
    let settings = DialogSettings::with_image_mode(false);
    let quote = MessageId::new("cmd");
    let msg = present(&settings, None, &two_qq_list(), Some(&quote)).await.unwrap();

    assert_eq!(msg[0], Element::Quote(quote));
    assert!(matches!(&msg[1], Element::Markup(m) if m.starts_with("<b>QQ Music</b>") && m.ends_with("请在 ")));
    assert_eq!(msg[2], Element::Time { ms: 45_000 });
    assert_eq!(msg[3], Element::markup("内，<br/>输入歌曲对应的序号"));
  }

  #[tokio::test]
  async fn image_mode_renders_list_node() {
    let mut settings = DialogSettings::with_image_mode(true);
    settings.menu_exit_command_tip = true;
    let renderer = FakeRenderer::new();
    let msg = present(&settings, Some(&renderer), &two_qq_list(), None).await.unwrap();

    assert_eq!(msg[0], Element::Image { data: FakeRenderer::PNG.to_vec(), mime: "image/png".into() });
    assert_eq!(msg[1], Element::text("退出选择请发[0,不听了]中的任意内容\n\n请在 "));
    assert_eq!(msg[2], Element::Time { ms: 45_000 });

    let pages = renderer.pages.lock().unwrap();
    assert_eq!(pages[0].1, LIST_SELECTOR);
    assert!(pages[0].0.contains("1. 晴天 -- Artista"));
  }

  #[tokio::test]
  async fn image_mode_without_renderer_is_an_error() {
    let settings = DialogSettings::with_image_mode(true);
    let err = present(&settings, None, &two_qq_list(), None).await.unwrap_err();
    assert!(matches!(err, CoreError::RendererUnavailable));
  }

  #[tokio::test]
  async fn renderer_failure_is_surfaced() {
    let settings = DialogSettings::with_image_mode(true);
    let renderer = FakeRenderer::failing();
    let err = present(&settings, Some(&renderer), &two_qq_list(), None).await.unwrap_err();

    assert!(matches!(err, CoreError::Render(RenderError::ElementNotFound(ref s)) if s == LIST_SELECTOR));
    assert_eq!(renderer.pages.lock().unwrap().len(), 1);
  }
}
