//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data root folder
pub const ROOT_FOLDER_ENV: &str = "LIFTFUEL_ROOT_FOLDER";
/// Environment variable carrying comma-separated review API keys
pub const API_KEYS_ENV: &str = "LIFTFUEL_API_KEYS";

const DATABASE_FILE: &str = "liftfuel.db";

/// Optional settings read from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileSettings {
    /// Data root folder override
    pub root_folder: Option<PathBuf>,
    /// Review API keys, tried in order
    #[serde(default)]
    pub api_keys: Vec<String>,
}

/// Load settings from the platform config file, if one exists
pub fn load_file_settings() -> Result<FileSettings> {
    let path = match config_file_path() {
        Some(path) => path,
        None => return Ok(FileSettings::default()),
    };

    let content = std::fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Platform config file location: `<config dir>/liftfuel/config.toml`,
/// with `/etc/liftfuel/config.toml` as the system fallback on Linux
fn config_file_path() -> Option<PathBuf> {
    if let Some(dir) = dirs::config_dir() {
        let user_config = dir.join("liftfuel").join("config.toml");
        if user_config.exists() {
            return Some(user_config);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/liftfuel/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolve the data root folder, priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent default data directory
pub fn resolve_root_folder(cli_arg: Option<&Path>, file: &FileSettings) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        return PathBuf::from(path);
    }

    if let Some(path) = &file.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default data folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("liftfuel"))
        .unwrap_or_else(|| PathBuf::from("./liftfuel_data"))
}

/// Create the root folder if it doesn't exist yet
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    std::fs::create_dir_all(root)?;
    Ok(())
}

/// Database path inside the root folder
pub fn database_path(root: &Path) -> PathBuf {
    root.join(DATABASE_FILE)
}

/// Resolve the ordered review API key list, priority order:
/// command-line keys, then the environment variable (comma separated),
/// then the config file.
pub fn resolve_api_keys(cli_keys: &[String], file: &FileSettings) -> Vec<String> {
    if !cli_keys.is_empty() {
        return cli_keys.to_vec();
    }

    if let Ok(raw) = std::env::var(API_KEYS_ENV) {
        let keys: Vec<String> = raw
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if !keys.is_empty() {
            return keys;
        }
    }

    file.api_keys.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_keys_take_precedence() {
        let file = FileSettings {
            root_folder: None,
            api_keys: vec!["file-key".to_string()],
        };
        let cli = vec!["cli-key".to_string()];

        assert_eq!(resolve_api_keys(&cli, &file), vec!["cli-key".to_string()]);
    }

    #[test]
    fn test_file_keys_used_when_cli_empty() {
        let file = FileSettings {
            root_folder: None,
            api_keys: vec!["file-key-1".to_string(), "file-key-2".to_string()],
        };

        assert_eq!(resolve_api_keys(&[], &file), file.api_keys);
    }

    #[test]
    fn test_cli_root_folder_takes_precedence() {
        let file = FileSettings {
            root_folder: Some(PathBuf::from("/from/file")),
            api_keys: vec![],
        };
        let cli = PathBuf::from("/from/cli");

        let resolved = resolve_root_folder(Some(cli.as_path()), &file);
        assert_eq!(resolved, cli);
    }

    #[test]
    fn test_database_path_inside_root() {
        let root = PathBuf::from("/data/liftfuel");
        assert_eq!(database_path(&root), PathBuf::from("/data/liftfuel/liftfuel.db"));
    }
}
