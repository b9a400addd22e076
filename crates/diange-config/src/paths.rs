use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable that relocates every diange directory under one root.
pub const BASE_DIR_ENV: &str = "DIANGE_BASE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("other: {0}")]
  Other(String),
}

/// Where diange keeps its config file and its cache (rendered menus).
#[derive(Debug, Clone)]
pub struct DiangePaths {
  pub config_dir: PathBuf,
  pub cache_dir: PathBuf,
}

impl DiangePaths {
  /// `$DIANGE_BASE_DIR` when set, otherwise the platform's per-user dirs.
  pub fn detect() -> Result<Self, ConfigError> {
    if let Some(base) = std::env::var_os(BASE_DIR_ENV).filter(|v| !v.is_empty()) {
      return Self::under(PathBuf::from(base));
    }

    let proj_dirs = ProjectDirs::from("com", "diange", "diange").ok_or(ConfigError::Directories)?;
    Self::at(proj_dirs.config_dir().to_path_buf(), proj_dirs.cache_dir().to_path_buf())
  }

  /// `config/` and `cache/` under a single root.
  pub fn under(base: PathBuf) -> Result<Self, ConfigError> {
    Self::at(base.join("config"), base.join("cache"))
  }

  /// Uses explicit directories, creating them when missing.
  pub fn at(config_dir: PathBuf, cache_dir: PathBuf) -> Result<Self, ConfigError> {
    std::fs::create_dir_all(&config_dir)?;
    std::fs::create_dir_all(&cache_dir)?;
    Ok(Self { config_dir, cache_dir })
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("diange.toml")
  }
}
