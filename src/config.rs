use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::Mode;

/// Fatal problems with the settings a session is created from.
/// These are never silently substituted with defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    EmptyCorpus { name: String },
    CorpusNotFound { name: String },
    MalformedCorpus { name: String },
    NonPositiveDuration,
    ZeroWordCount,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::EmptyCorpus { name } => {
                write!(f, "corpus '{name}' contains no entries")
            }
            ConfigurationError::CorpusNotFound { name } => {
                write!(f, "no corpus named '{name}'")
            }
            ConfigurationError::MalformedCorpus { name } => {
                write!(f, "corpus '{name}' is not valid corpus json")
            }
            ConfigurationError::NonPositiveDuration => {
                write!(f, "session duration must be a positive number of seconds")
            }
            ConfigurationError::ZeroWordCount => {
                write!(f, "word-stream length must be at least one word")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub duration_secs: u64,
    pub mode: Mode,
    pub word_count: usize,
    pub corpus: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: 30,
            mode: Mode::WordStream,
            word_count: 50,
            corpus: "halloween".to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.duration_secs == 0 {
            return Err(ConfigurationError::NonPositiveDuration);
        }
        if self.mode == Mode::WordStream && self.word_count == 0 {
            return Err(ConfigurationError::ZeroWordCount);
        }
        Ok(())
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
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "hauntype") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("hauntype_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            duration_secs: 10,
            mode: Mode::FixedPassage,
            word_count: 100,
            corpus: "halloween".into(),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn load_missing_file_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nope.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn validate_rejects_zero_duration() {
        let cfg = Config {
            duration_secs: 0,
            ..Config::default()
        };
        assert_matches!(cfg.validate(), Err(ConfigurationError::NonPositiveDuration));
    }

    #[test]
    fn validate_rejects_zero_word_count_in_word_stream_mode() {
        let cfg = Config {
            word_count: 0,
            ..Config::default()
        };
        assert_matches!(cfg.validate(), Err(ConfigurationError::ZeroWordCount));
    }

    #[test]
    fn validate_ignores_word_count_in_passage_mode() {
        let cfg = Config {
            mode: Mode::FixedPassage,
            word_count: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_ok());
    }
}
