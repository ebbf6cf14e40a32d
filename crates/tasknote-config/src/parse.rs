//! Configuration file parsing.
//!
//! Parses `tasknote.toml` into intermediate `RawConfig` structures in which every
//! field is optional; [`Config::from_raw`](crate::Config::from_raw) fills the gaps.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Storage locations section.
    pub storage: Option<RawStorage>,
    /// Index settings section.
    pub index: Option<RawIndexSettings>,
    /// Search settings section.
    pub search: Option<RawSearchSettings>,
}

/// Raw `[storage]` section. Paths are unresolved.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawStorage {
    /// SQLite database file.
    pub database: Option<String>,
    /// Task index directory.
    pub task_index: Option<String>,
    /// Note index directory.
    pub note_index: Option<String>,
}

/// Raw `[index]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIndexSettings {
    /// Stemming language.
    pub stemmer: Option<String>,
    /// Writer memory budget in bytes.
    pub writer_heap_size: Option<usize>,
}

/// Raw `[search]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchSettings {
    /// Maximum tasks per search.
    pub task_limit: Option<usize>,
    /// Maximum notes per search.
    pub note_limit: Option<usize>,
    /// Maximum characters per highlighted fragment.
    pub snippet_max_chars: Option<usize>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.storage.is_none());
        assert!(config.index.is_none());
        assert!(config.search.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[storage]
database = "db/tasks.db"
task_index = "~/indices/tasks"
note_index = "/var/notes"

[index]
stemmer = "french"
writer_heap_size = 20000000

[search]
task_limit = 5
note_limit = 7
snippet_max_chars = 80
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let storage = config.storage.unwrap();
        assert_eq!(storage.database.as_deref(), Some("db/tasks.db"));
        assert_eq!(storage.task_index.as_deref(), Some("~/indices/tasks"));
        let index = config.index.unwrap();
        assert_eq!(index.stemmer.as_deref(), Some("french"));
        assert_eq!(index.writer_heap_size, Some(20_000_000));
        let search = config.search.unwrap();
        assert_eq!(search.task_limit, Some(5));
        assert_eq!(search.note_limit, Some(7));
        assert_eq!(search.snippet_max_chars, Some(80));
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = parse_config_str("[search\n", Path::new("broken.toml")).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_parse_wrong_type() {
        let result = parse_config_str("[search]\ntask_limit = \"ten\"\n", Path::new("t.toml"));
        assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = parse_config_file(Path::new("/nonexistent/tasknote.toml"));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
