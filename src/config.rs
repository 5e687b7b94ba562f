//! Learner settings, stored as TOML.

use crate::error::{Result, TrainerError};
use crate::models::QuizSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_PATH: &str = "vocab.toml";
pub const DEFAULT_DATABASE_PATH: &str = "vocab.sqlite3";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub quiz: QuizSettings,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

impl Config {
    /// Reads settings from `path`. A missing file yields the defaults; keys
    /// absent from the file keep their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut config: Config = toml::from_str(&content)
            .map_err(|e| TrainerError::Config(format!("{}: {e}", path.display())))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| TrainerError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    fn normalize(&mut self) {
        if self.quiz.words_per_quiz == 0 {
            warn!("words_per_quiz must be at least 1, using 1");
            self.quiz.words_per_quiz = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DirectionSetting;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.quiz.words_per_quiz, 10);
        assert_eq!(config.quiz.direction, DirectionSetting::Forward);
        assert_eq!(config.storage.database, PathBuf::from("vocab.sqlite3"));
    }

    #[test]
    fn test_partial_file_merges_over_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vocab.toml");
        fs::write(&path, "[quiz]\ndirection = \"random\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.quiz.direction, DirectionSetting::Random);
        assert_eq!(config.quiz.words_per_quiz, 10);
    }

    #[test]
    fn test_zero_session_size_normalized() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vocab.toml");
        fs::write(&path, "[quiz]\nwords_per_quiz = 0\n").unwrap();

        assert_eq!(Config::load(&path).unwrap().quiz.words_per_quiz, 1);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vocab.toml");
        fs::write(&path, "[quiz]\ndirection = \"sideways\"\n").unwrap();

        assert!(matches!(Config::load(&path), Err(TrainerError::Config(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("vocab.toml");
        let mut config = Config::default();
        config.quiz.words_per_quiz = 25;
        config.quiz.direction = DirectionSetting::Reverse;

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
