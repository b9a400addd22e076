use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::element::quoted;
use crate::domain::{DialogSettings, Element};
use crate::errors::CoreError;
use crate::ports::{ChatSession, HttpClient, PageRenderer};
use crate::services::catalog::CatalogService;
use crate::services::waiter::{self, Selection};
use crate::services::{delivery, presenter};

/// Command name and its aliases.
pub const COMMAND: &str = "music";
pub const ALIASES: [&str; 2] = ["mdff", "点歌"];

/// True when `word` invokes the song command.
pub fn is_command(word: &str) -> bool {
  word == COMMAND || ALIASES.contains(&word)
}

/// Controlador del diálogo: búsqueda → lista → selección → entrega.
///
/// Holds no per-invocation state; everything an invocation needs (song list,
/// quote reference) lives on the stack of [`DialogService::run`].
pub struct DialogService<C>
where
  C: HttpClient,
{
  catalog: CatalogService<C>,
  renderer: Option<Arc<dyn PageRenderer>>,
  settings: DialogSettings,
}

impl<C> DialogService<C>
where
  C: HttpClient,
{
  pub fn new(
    catalog: CatalogService<C>,
    renderer: Option<Arc<dyn PageRenderer>>,
    settings: DialogSettings,
  ) -> Result<Self, CoreError> {
    settings.validate()?;
    Ok(Self { catalog, renderer, settings })
  }

  /// Runs one invocation of the command.
  ///
  /// `Ok(Some(reply))` is a final message for the host to send (prompts,
  /// cancellations, failures the user should see). `Ok(None)` means the song
  /// was delivered. `Err` is fatal and left to the host's own handler.
  pub async fn run<S>(&self, session: &S, keyword: Option<&str>) -> Result<Option<Vec<Element>>, CoreError>
  where
    S: ChatSession + ?Sized,
  {
    let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) else {
      return Ok(Some(vec![Element::text("请输入歌曲相关信息。")]));
    };

    // 1) Buscar en ambos catálogos
    let list = self.catalog.search(keyword).await;
    if list.is_empty() {
      info!(keyword, "no catalog returned results");
      return Ok(Some(vec![Element::text("无法获取歌曲列表，请稍后再试。")]));
    }

    // 2) Enviar la lista
    let mut quote = session.message_id();
    let menu = presenter::present(&self.settings, self.renderer.as_deref(), &list, quote.as_ref()).await?;
    if let Some(id) = session.send(menu).await?.pop() {
      quote = Some(id);
    }

    // 3) Esperar la selección
    let exit_tokens = self.settings.exit_tokens();
    let selection =
      waiter::await_selection(session, self.settings.wait_timeout(), &exit_tokens, list.len(), &mut quote).await?;

    let position = match selection {
      Selection::TimedOut => return Ok(Some(quoted(quote.as_ref(), "输入超时，已取消点歌。"))),
      Selection::Exit => return Ok(Some(quoted(quote.as_ref(), "已退出歌曲选择。"))),
      Selection::Invalid => return Ok(Some(quoted(quote.as_ref(), "序号输入错误，已退出歌曲选择。"))),
      Selection::Pick(position) => position,
    };

    // 4) Resolver y entregar
    let Some(record) = list.get(position) else {
      return Ok(Some(quoted(quote.as_ref(), "序号输入错误，已退出歌曲选择。")));
    };
    debug!(position, title = %record.title, vendor = %record.vendor, "song selected");

    delivery::deliver(&self.catalog, session, &self.settings, record, quote.as_ref()).await
  }
}
