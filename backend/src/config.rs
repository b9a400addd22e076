use diange_config::{ConfigBackend, ConfigError, TomlConfigBackend};
use diange_core::domain::DialogSettings;
use diange_core::services::CatalogEndpoints;
use diange_http::HttpConfig;

/// Everything the binary reads from `diange.toml`.
#[derive(Debug, Clone)]
pub struct AppConfig {
  /// `[music]`: dialog behaviour. Required, `image_mode` has no default.
  pub dialog: DialogSettings,
  /// `[catalog]`: vendor API base URLs.
  pub catalog: CatalogEndpoints,
  /// `[http]`: client timeouts and user agent.
  pub http: HttpConfig,
}

impl AppConfig {
  /// Loads all sections. Optional sections are written back so their
  /// effective values show up in the file.
  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    let dialog: DialogSettings = backend.load_section("music").map_err(|e| {
      ConfigError::Other(format!("{e}; add a [music] section with at least `image_mode = true|false`"))
    })?;

    let catalog: CatalogEndpoints = backend.load_section_with_default("catalog")?;
    backend.save_section("catalog", &catalog)?;

    let http: HttpConfig = backend.load_section_with_default("http")?;
    backend.save_section("http", &http)?;

    Ok(Self { dialog, catalog, http })
  }
}
