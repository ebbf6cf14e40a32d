//! Default locations for the configuration file and stored data.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::ConfigError;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = "tasknote.toml";

/// Returns the configuration path used when none is given: `tasknote.toml` in `cwd`.
pub fn default_config_path(cwd: &Path) -> PathBuf {
    cwd.join(CONFIG_FILENAME)
}

/// Returns the platform data directory for tasknote, e.g.
/// `~/.local/share/tasknote` on Linux.
pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("", "", "tasknote")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(ConfigError::NoDataDirectory)
}
