//! Path resolution for storage settings.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::ConfigError;

/// Resolves a configured path to an absolute-or-base-relative path.
///
/// - `~` and `~/rest` expand to the home directory
/// - relative paths are joined onto `base` (the config file's directory)
/// - absolute paths are returned unchanged
///
/// Unlike tree paths, storage paths need not exist yet: indices and the database
/// are created on first open.
pub fn resolve_path(path: &str, base: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = expand_tilde(path)?;
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(base.join(expanded))
    }
}

/// Expands a tilde prefix to the home directory.
fn expand_tilde(path: &str) -> Result<PathBuf, ConfigError> {
    if path == "~" {
        return home_dir();
    }

    if let Some(rest) = path.strip_prefix("~/") {
        return Ok(home_dir()?.join(rest));
    }

    Ok(PathBuf::from(path))
}

/// Returns the home directory.
fn home_dir() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDirectory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_joins_base() {
        let resolved = resolve_path("idx/tasks", Path::new("/srv/app")).unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/app/idx/tasks"));
    }

    #[test]
    fn test_dot_relative_joins_base() {
        let resolved = resolve_path("./tasks.db", Path::new("/srv/app")).unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/app/./tasks.db"));
    }

    #[test]
    fn test_absolute_unchanged() {
        let resolved = resolve_path("/var/lib/tasks.db", Path::new("/srv/app")).unwrap();
        assert_eq!(resolved, PathBuf::from("/var/lib/tasks.db"));
    }

    #[test]
    fn test_tilde_expands_home() {
        let Some(dirs) = BaseDirs::new() else {
            return;
        };
        let resolved = resolve_path("~/indices", Path::new("/srv/app")).unwrap();
        assert_eq!(resolved, dirs.home_dir().join("indices"));
    }
}
