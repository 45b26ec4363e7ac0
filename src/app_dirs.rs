use crate::config::Backend;
use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "recite")
    }

    /// Directory holding the document collection and logs
    pub fn state_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("recite")
        } else {
            Self::project()
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }

    /// Default collection location for a backend. The JSON backend keeps one
    /// file per key inside this directory; SQLite uses this file.
    pub fn store_path(backend: Backend) -> PathBuf {
        match backend {
            Backend::Json => Self::state_dir().join("documents"),
            Backend::Sqlite => Self::state_dir().join("documents.db"),
        }
    }

    pub fn log_dir() -> PathBuf {
        Self::state_dir().join("logs")
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("recite_config.json"))
    }
}
