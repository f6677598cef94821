//! User settings loaded from a TOML file

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// File name looked up in the package data directory
pub const SETTINGS_FILE: &str = "classifier.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub columns: ColumnSettings,
    pub group: GroupSettings,
}

/// Column handling for alignment tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSettings {
    /// Extra header renames, applied after the built-in ones
    pub rename: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSettings {
    /// Default key column for `group`
    pub by: String,
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self { by: "qseqid".to_string() }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        toml::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Load `path` if it exists, otherwise the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.is_file() { Self::load(path) } else { Ok(Self::default()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.group.by, "qseqid");
        assert!(settings.columns.rename.is_empty());
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "[columns.rename]\n\"query id\" = \"qseqid\"\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.columns.rename["query id"], "qseqid");
        assert_eq!(settings.group.by, "qseqid");
    }

    #[test]
    fn test_missing_file_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_or_default(&temp_dir.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_file_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "[group]\nby = 3\n").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(SETTINGS_FILE));
    }
}
