mod backend;
mod io;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use io::atomic_write_str;
pub use paths::{ConfigError, DiangePaths};

use once_cell::sync::Lazy;

// Singleton de paths (portable / system)
pub static PATHS: Lazy<Result<DiangePaths, String>> = Lazy::new(|| DiangePaths::detect().map_err(|e| e.to_string()));

/// Backend over the detected paths.
pub fn config_backend() -> Result<TomlConfigBackend, ConfigError> {
  let paths = (*PATHS).as_ref().map_err(|e| ConfigError::Other(format!("init paths: {e}")))?;
  Ok(TomlConfigBackend::new(paths.clone()))
}
