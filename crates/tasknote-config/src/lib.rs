//! Configuration system for tasknote.
//!
//! tasknote reads a single TOML file, `tasknote.toml`. When the file exists, every
//! relative path in it is resolved against the file's directory and unset paths
//! default to siblings of the file. When it does not exist, storage defaults to the
//! platform data directory.

#![warn(missing_docs)]

mod discovery;
mod error;
mod parse;
mod resolve;
mod templates;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, default_config_path, default_data_dir};
pub use error::ConfigError;
pub use parse::{
    RawConfig, RawIndexSettings, RawSearchSettings, RawStorage, parse_config_file,
    parse_config_str,
};
pub use resolve::resolve_path;
use serde::Serialize;
pub use templates::config_template;

/// Smallest writer heap tantivy accepts for a single indexing thread.
pub const MIN_WRITER_HEAP_SIZE: usize = 15_000_000;

/// Fully resolved configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Where the database and index directories live.
    pub storage: StorageSettings,
    /// Index writer and analysis settings.
    pub index: IndexSettings,
    /// Query defaults.
    pub search: SearchSettings,
    /// The file this configuration was loaded from, if any.
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from `path`, falling back to defaults under the
    /// platform data directory if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::defaults_in(&default_data_dir()?))
        }
    }

    /// Loads configuration from an existing file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = parse_config_file(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let mut config = Self::from_raw(raw, base)?;
        config.config_file = Some(path.to_path_buf());
        Ok(config)
    }

    /// Returns the default configuration with storage rooted at `base`.
    pub fn defaults_in(base: &Path) -> Self {
        Self {
            storage: StorageSettings::in_dir(base),
            index: IndexSettings::default(),
            search: SearchSettings::default(),
            config_file: None,
        }
    }

    /// Resolves a parsed file against `base`, applying defaults and validating values.
    pub fn from_raw(raw: RawConfig, base: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::defaults_in(base);

        if let Some(storage) = raw.storage {
            if let Some(database) = storage.database {
                config.storage.database = resolve_path(&database, base)?;
            }
            if let Some(task_index) = storage.task_index {
                config.storage.task_index = resolve_path(&task_index, base)?;
            }
            if let Some(note_index) = storage.note_index {
                config.storage.note_index = resolve_path(&note_index, base)?;
            }
        }

        if let Some(index) = raw.index {
            if let Some(stemmer) = index.stemmer {
                config.index.stemmer = stemmer;
            }
            if let Some(heap) = index.writer_heap_size {
                config.index.writer_heap_size = heap;
            }
        }

        if let Some(search) = raw.search {
            if let Some(limit) = search.task_limit {
                config.search.task_limit = limit;
            }
            if let Some(limit) = search.note_limit {
                config.search.note_limit = limit;
            }
            if let Some(chars) = search.snippet_max_chars {
                config.search.snippet_max_chars = chars;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that TOML types alone cannot express.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.index.stemmer.trim().is_empty() {
            return Err(ConfigError::invalid("index.stemmer", "must not be empty"));
        }
        if self.index.writer_heap_size < MIN_WRITER_HEAP_SIZE {
            return Err(ConfigError::invalid(
                "index.writer_heap_size",
                format!("must be at least {MIN_WRITER_HEAP_SIZE}"),
            ));
        }
        for (key, value) in [
            ("search.task_limit", self.search.task_limit),
            ("search.note_limit", self.search.note_limit),
            ("search.snippet_max_chars", self.search.snippet_max_chars),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(key, "must be greater than zero"));
            }
        }
        Ok(())
    }

    /// Renders the effective settings in `tasknote.toml` format.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}

/// Locations of persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageSettings {
    /// SQLite database file.
    pub database: PathBuf,
    /// Task index directory.
    pub task_index: PathBuf,
    /// Independent-note index directory.
    pub note_index: PathBuf,
}

impl StorageSettings {
    /// Default file names placed inside `base`.
    pub fn in_dir(base: &Path) -> Self {
        Self {
            database: base.join("tasks.db"),
            task_index: base.join("task_index"),
            note_index: base.join("note_index"),
        }
    }
}

/// Index writer and text analysis settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSettings {
    /// Stemming language.
    pub stemmer: String,
    /// Writer memory budget in bytes.
    pub writer_heap_size: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            stemmer: String::from("english"),
            writer_heap_size: 50_000_000,
        }
    }
}

/// Query defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSettings {
    /// Maximum tasks per search.
    pub task_limit: usize,
    /// Maximum notes per search.
    pub note_limit: usize,
    /// Maximum characters per highlighted fragment.
    pub snippet_max_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            task_limit: 10,
            note_limit: 20,
            snippet_max_chars: 150,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_search_defaults() {
        let search = SearchSettings::default();
        assert_eq!(search.task_limit, 10);
        assert_eq!(search.note_limit, 20);
        assert_eq!(search.snippet_max_chars, 150);
    }

    #[test]
    fn test_defaults_in_base() {
        let config = Config::defaults_in(Path::new("/data"));
        assert_eq!(config.storage.database, PathBuf::from("/data/tasks.db"));
        assert_eq!(config.storage.task_index, PathBuf::from("/data/task_index"));
        assert_eq!(config.storage.note_index, PathBuf::from("/data/note_index"));
        assert_eq!(config.index.stemmer, "english");
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_resolves_against_file_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"
[storage]
task_index = "idx/tasks"

[search]
task_limit = 3
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.task_index, dir.path().join("idx/tasks"));
        assert_eq!(config.storage.database, dir.path().join("tasks.db"));
        assert_eq!(config.search.task_limit, 3);
        assert_eq!(config.search.note_limit, 20);
        assert_eq!(config.config_file.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_rejects_zero_limit() {
        let raw = parse_config_str("[search]\nnote_limit = 0\n", Path::new("t.toml")).unwrap();
        let err = Config::from_raw(raw, Path::new("/base")).unwrap_err();
        assert!(err.to_string().contains("search.note_limit"));
    }

    #[test]
    fn test_rejects_small_writer_heap() {
        let raw =
            parse_config_str("[index]\nwriter_heap_size = 1000\n", Path::new("t.toml")).unwrap();
        let err = Config::from_raw(raw, Path::new("/base")).unwrap_err();
        assert!(err.to_string().contains("writer_heap_size"));
    }

    #[test]
    fn test_settings_to_toml() {
        let config = Config::defaults_in(Path::new("/data"));
        let toml = config.settings_to_toml().unwrap();

        assert!(toml.contains("[storage]"));
        assert!(toml.contains("[index]"));
        assert!(toml.contains("[search]"));
        assert!(toml.contains("stemmer = \"english\""));
        assert!(toml.contains("task_limit = 10"));

        let parsed: toml::Value = toml::from_str(&toml).unwrap();
        assert!(parsed.get("storage").is_some());
    }
}
