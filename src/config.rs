use dirs::home_dir;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::structs::ScanOptions;

/// File holding the scanner preferences inside the data directory
const PREFERENCES_FILE: &str = "statement_scanner.json";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid preferences in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerPreferences {
    pub scan: ScanOptions,
    /// `env_logger` filter used when `RUST_LOG` is not set
    pub log_filter: Option<String>,
}

impl ScannerPreferences {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let prefs: ScannerPreferences =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            "Loaded scanner prefs from {}: line_comments={}, block_comments={}, log_filter={:?}",
            path.display(),
            prefs.scan.line_comments,
            prefs.scan.block_comments,
            prefs.log_filter
        );
        Ok(prefs)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Preferences from the data directory. A missing file yields the defaults;
    /// an unreadable one is reported and also falls back to the defaults.
    pub fn load() -> Self {
        let path = preferences_path();
        if !path.exists() {
            info!("No scanner prefs at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from_path(&path) {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = preferences_path();
        self.save_to_path(&path)?;
        info!("Saved scanner prefs to {}", path.display());
        Ok(())
    }
}

/// Get the default tabular directory in home folder
fn default_tabular_dir() -> PathBuf {
    if let Some(mut hd) = home_dir() {
        hd.push(".tabular");
        hd
    } else {
        PathBuf::from(".tabular")
    }
}

/// Resolve the data directory from an optional override. Relative overrides
/// are ignored.
fn data_dir_from(custom_dir: Option<String>) -> PathBuf {
    if let Some(custom_dir) = custom_dir {
        let path = PathBuf::from(custom_dir);
        if path.is_absolute() {
            return path;
        }
        warn!(
            "Ignoring relative TABULAR_DATA_DIR {}, using default",
            path.display()
        );
    }
    default_tabular_dir()
}

pub fn get_data_dir() -> PathBuf {
    data_dir_from(std::env::var("TABULAR_DATA_DIR").ok())
}

pub fn preferences_path() -> PathBuf {
    get_data_dir().join(PREFERENCES_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(PREFERENCES_FILE);
        let prefs = ScannerPreferences {
            scan: ScanOptions {
                line_comments: true,
                block_comments: false,
            },
            log_filter: Some("tabular_statements=trace".into()),
        };
        prefs.save_to_path(&path).unwrap();
        assert_eq!(ScannerPreferences::load_from_path(&path).unwrap(), prefs);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        fs::write(&path, r#"{"scan": {"block_comments": false}}"#).unwrap();
        let prefs = ScannerPreferences::load_from_path(&path).unwrap();
        assert!(prefs.scan.line_comments);
        assert!(!prefs.scan.block_comments);
        assert_eq!(prefs.log_filter, None);
    }

    #[test]
    fn test_load_errors_are_typed() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            ScannerPreferences::load_from_path(&missing),
            Err(ConfigError::Io { .. })
        ));

        let broken = dir.path().join(PREFERENCES_FILE);
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            ScannerPreferences::load_from_path(&broken),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn test_data_dir_override() {
        let dir = tempdir().unwrap();
        let custom = dir.path().to_string_lossy().into_owned();
        assert_eq!(data_dir_from(Some(custom)), dir.path());
        assert_eq!(data_dir_from(Some("relative".into())), default_tabular_dir());
        assert_eq!(data_dir_from(None), default_tabular_dir());
    }
}
