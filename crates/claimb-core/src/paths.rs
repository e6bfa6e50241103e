//! Where Claimb keeps its config and cache on disk.

use crate::error::{AppError, AppResult};
use std::fs;
use std::path::PathBuf;

/// Directory name under the home directory.
pub const DATA_DIR: &str = ".claimb";
/// SQLite cache filename.
pub const CACHE_DB: &str = "cache.db";
/// Overrides the data directory when set and non-empty.
pub const DATA_DIR_ENV: &str = "CLAIMB_DATA_DIR";

/// Data directory, created if missing.
///
/// `CLAIMB_DATA_DIR` wins over `~/.claimb`.
pub fn get_data_dir() -> AppResult<PathBuf> {
    let data_dir = resolve_data_dir(std::env::var(DATA_DIR_ENV).ok(), dirs::home_dir())?;
    fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

fn resolve_data_dir(custom: Option<String>, home: Option<PathBuf>) -> AppResult<PathBuf> {
    if let Some(dir) = custom.filter(|d| !d.trim().is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    home.map(|h| h.join(DATA_DIR))
        .ok_or_else(|| AppError::Config("cannot determine home directory".to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_dir_wins() {
        let dir = resolve_data_dir(Some("/tmp/claimb".into()), Some("/home/me".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/claimb"));
    }

    #[test]
    fn test_blank_custom_dir_falls_back_to_home() {
        let dir = resolve_data_dir(Some("  ".into()), Some("/home/me".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/home/me").join(DATA_DIR));
    }

    #[test]
    fn test_missing_home_is_a_config_error() {
        assert!(matches!(resolve_data_dir(None, None), Err(AppError::Config(_))));
    }
}
