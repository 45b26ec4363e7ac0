use crate::app_dirs::AppDirs;
use crate::error::{Error, Result};
use crate::kv::{FileKv, KvStore, SqliteKv};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Where the document collection lives
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Backend {
    /// a JSON file per collection
    #[default]
    Json,
    /// a single SQLite database
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub store_path: Option<PathBuf>,
    pub advisories: bool,
    pub keep_resolved_mistakes: bool,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::Json,
            store_path: None,
            advisories: true,
            keep_resolved_mistakes: false,
            color: true,
        }
    }
}

impl Config {
    /// Store location: the configured path or the per-backend default
    pub fn resolved_store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| AppDirs::store_path(self.backend))
    }

    /// Open the persistence backend at the resolved store path
    pub fn open_kv(&self) -> Result<Box<dyn KvStore>> {
        let path = self.resolved_store_path();
        match self.backend {
            Backend::Json if path.is_file() => Err(Error::config(format!(
                "json store path {} is a file, expected a directory",
                path.display()
            ))),
            Backend::Json => Ok(Box::new(FileKv::with_dir(&path))),
            Backend::Sqlite if path.is_dir() => Err(Error::config(format!(
                "sqlite store path {} is a directory, expected a database file",
                path.display()
            ))),
            Backend::Sqlite => Ok(Box::new(SqliteKv::open(&path)?)),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("ignoring unreadable config {}: {e}", self.path.display());
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
