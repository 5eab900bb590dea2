//! Configuration Management
//!
//! This module resolves which database file the directory operates on.
//!
//! # Configuration Locations
//! - Local: `.orgctl/config.json` (team-shareable, per-project)
//! - Global: `~/.config/orgctl/config.json` (per-user)
//!
//! # Resolution Precedence
//! 1. Explicit `--db` flag (highest priority)
//! 2. `ORGCTL_DB` environment variable
//! 3. Local config file (`.orgctl/config.json`)
//! 4. Global config file (`~/.config/orgctl/config.json`)
//! 5. Platform data directory default (`<data_dir>/orgctl/company.db`)
//!
//! Missing config files are skipped silently; a file that exists but does
//! not parse is a `ConfigError` rather than a silent fallthrough.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OrgError, Result};

/// Environment variable overriding the database file location
pub const ENV_DB: &str = "ORGCTL_DB";

/// Directory holding the local config file
const LOCAL_CONFIG_DIR: &str = ".orgctl";

/// Config file name, local and global
const CONFIG_FILE: &str = "config.json";

/// Default database file name under the platform data directory
const DEFAULT_DB_FILE: &str = "company.db";

/// On-disk configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Database file the directory operates on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_file: Option<PathBuf>,
}

/// Resolve the database file path from flag, environment, and config files
pub fn resolve_db_path(cli_override: Option<PathBuf>) -> Result<PathBuf> {
    let env_override = std::env::var_os(ENV_DB).map(PathBuf::from);
    resolve_with(cli_override, env_override, Path::new("."), dirs::config_dir(), dirs::data_dir())
}

/// Precedence logic, separated from process globals for testability
fn resolve_with(
    cli_override: Option<PathBuf>,
    env_override: Option<PathBuf>,
    local_root: &Path,
    config_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = cli_override {
        return Ok(path);
    }
    if let Some(path) = env_override {
        return Ok(path);
    }

    let local_file = local_root.join(LOCAL_CONFIG_DIR).join(CONFIG_FILE);
    if let Some(path) = load_config_file(&local_file)?.and_then(|c| c.db_file) {
        return Ok(path);
    }

    if let Some(dir) = config_dir {
        let global_file = dir.join("orgctl").join(CONFIG_FILE);
        if let Some(path) = load_config_file(&global_file)?.and_then(|c| c.db_file) {
            return Ok(path);
        }
    }

    let data_dir = data_dir
        .ok_or_else(|| OrgError::config_error("Could not determine a platform data directory"))?;
    Ok(data_dir.join("orgctl").join(DEFAULT_DB_FILE))
}

/// Load one config file; `None` when it does not exist
fn load_config_file(path: &Path) -> Result<Option<DirectoryConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| OrgError::config_error(format!("Failed to read {}: {e}", path.display())))?;
    let config: DirectoryConfig = serde_json::from_str(&content)
        .map_err(|e| OrgError::config_error(format!("Failed to parse {}: {e}", path.display())))?;
    Ok(Some(config))
}

/// Create the parent directory of the database file if needed
///
/// The default location lives under the platform data directory, which may
/// not exist on first run.
pub fn ensure_parent_dir(db_file: &Path) -> Result<()> {
    if let Some(parent) = db_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                OrgError::config_error(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(tag: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("orgctl_config_{tag}"));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        root
    }

    fn write_config(dir: &Path, db_file: &str) {
        let config_dir = dir.join(LOCAL_CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(
            config_dir.join(CONFIG_FILE),
            format!(r#"{{"db_file": "{db_file}"}}"#),
        )
        .unwrap();
    }

    #[test]
    fn test_cli_flag_wins_over_everything() {
        let root = temp_root("cli_wins");
        write_config(&root, "/from/local.db");

        let resolved = resolve_with(
            Some(PathBuf::from("/from/flag.db")),
            Some(PathBuf::from("/from/env.db")),
            &root,
            None,
            Some(root.clone()),
        )
        .unwrap();
        assert_eq!(resolved, PathBuf::from("/from/flag.db"));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_env_wins_over_local_config() {
        let root = temp_root("env_wins");
        write_config(&root, "/from/local.db");

        let resolved = resolve_with(
            None,
            Some(PathBuf::from("/from/env.db")),
            &root,
            None,
            Some(root.clone()),
        )
        .unwrap();
        assert_eq!(resolved, PathBuf::from("/from/env.db"));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_local_config_wins_over_global() {
        let root = temp_root("local_wins");
        write_config(&root, "/from/local.db");

        let global_dir = root.join("global_config");
        fs::create_dir_all(global_dir.join("orgctl")).unwrap();
        fs::write(
            global_dir.join("orgctl").join(CONFIG_FILE),
            r#"{"db_file": "/from/global.db"}"#,
        )
        .unwrap();

        let resolved =
            resolve_with(None, None, &root, Some(global_dir), Some(root.clone())).unwrap();
        assert_eq!(resolved, PathBuf::from("/from/local.db"));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_default_under_data_dir() {
        let root = temp_root("default");

        let resolved = resolve_with(None, None, &root, None, Some(root.clone())).unwrap();
        assert_eq!(resolved, root.join("orgctl").join(DEFAULT_DB_FILE));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_malformed_config_is_an_error_not_a_fallthrough() {
        let root = temp_root("malformed");
        let config_dir = root.join(LOCAL_CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(CONFIG_FILE), "not json").unwrap();

        let err = resolve_with(None, None, &root, None, Some(root.clone())).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_ensure_parent_dir_creates_missing_directories() {
        let root = temp_root("parent");
        let db_file = root.join("nested").join("deeper").join("company.db");

        ensure_parent_dir(&db_file).unwrap();
        assert!(db_file.parent().unwrap().is_dir());

        let _ = fs::remove_dir_all(&root);
    }
}
