//! Configuration for the vocabulary trainer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub study: StudyConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| Self::parse(&s))
            .unwrap_or_default()
    }

    fn parse(content: &str) -> Option<Self> {
        match toml::from_str(content) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Ignoring invalid config: {}", e);
                None
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(self)?;
            std::fs::write(path, content)?;
        }
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "vocab-trainer")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// Where sections, the database and logs live.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .or_else(|| directories::ProjectDirs::from("", "", "vocab-trainer").map(|d| d.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir().join("vocab.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("vocab-trainer.log")
    }

    pub fn export_dir(&self) -> PathBuf {
        self.display
            .export_dir
            .clone()
            .unwrap_or_else(|| self.data_dir().join("exports"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    File,
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Fixed seed for quiz and test order.
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_word_counts: bool,
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

fn default_true() -> bool { true }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_word_counts: true,
            export_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert!(config.display.show_word_counts);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.study.shuffle_seed, None);
    }

    #[test]
    fn test_partial_file() {
        let config = Config::parse(
            r#"
            [storage]
            backend = "file"
            data_dir = "/tmp/vocab"

            [study]
            shuffle_seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/vocab"));
        assert_eq!(config.db_path(), PathBuf::from("/tmp/vocab/vocab.db"));
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/vocab/exports"));
        assert_eq!(config.study.shuffle_seed, Some(42));
        assert!(config.display.show_word_counts);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        assert!(Config::parse("[storage]\nbackend = \"floppy\"").is_none());
    }
}
