pub mod config;
pub mod kv;

use anyhow::{Context, Result, anyhow};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

pub use config::{Config, ConfigStorage, GeneralConfig, TomlConfigStorage};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};

const APP_DIR: &str = "turnos";

/// Resolve and create the data and config directories.
/// Returns (data_dir, config_dir)
///
/// `data_override` (the `--data-dir` flag) replaces the data directory
/// outright; otherwise XDG locations are used:
/// - Data: $XDG_DATA_HOME/turnos (default: ~/.local/share/turnos)
/// - Config: $XDG_CONFIG_HOME/turnos (default: ~/.config/turnos)
///
/// `$HOME` is only consulted when an XDG variable is unset or empty.
pub fn ensure_directories(data_override: Option<PathBuf>) -> Result<(PathBuf, PathBuf)> {
    let data_dir = match data_override {
        Some(dir) => dir,
        None => app_dir(
            env::var_os("XDG_DATA_HOME"),
            env::var_os("HOME"),
            ".local/share",
        )?,
    };
    let config_dir = app_dir(
        env::var_os("XDG_CONFIG_HOME"),
        env::var_os("HOME"),
        ".config",
    )?;

    for dir in [&data_dir, &config_dir] {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {:?}", dir))?;
    }

    log::debug!("Data directory: {:?}", data_dir);
    log::debug!("Config directory: {:?}", config_dir);

    Ok((data_dir, config_dir))
}

/// `<xdg_base>/turnos`, falling back to `<home>/<home_relative>/turnos`
fn app_dir(
    xdg_base: Option<OsString>,
    home: Option<OsString>,
    home_relative: &str,
) -> Result<PathBuf> {
    if let Some(base) = xdg_base.filter(|b| !b.is_empty()) {
        return Ok(PathBuf::from(base).join(APP_DIR));
    }

    let home = home
        .filter(|h| !h.is_empty())
        .ok_or_else(|| anyhow!("HOME environment variable not set"))?;
    Ok(PathBuf::from(home).join(home_relative).join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_dir_prefers_xdg() {
        let dir = app_dir(Some("/xdg/data".into()), Some("/home/ana".into()), ".local/share").unwrap();
        assert_eq!(dir, PathBuf::from("/xdg/data/turnos"));
    }

    #[test]
    fn test_app_dir_falls_back_to_home() {
        let dir = app_dir(None, Some("/home/ana".into()), ".config").unwrap();
        assert_eq!(dir, PathBuf::from("/home/ana/.config/turnos"));

        // Empty XDG variables count as unset
        let dir = app_dir(Some("".into()), Some("/home/ana".into()), ".local/share").unwrap();
        assert_eq!(dir, PathBuf::from("/home/ana/.local/share/turnos"));
    }

    #[test]
    fn test_app_dir_needs_home_without_xdg() {
        assert!(app_dir(None, None, ".config").is_err());
        assert!(app_dir(Some("/xdg".into()), None, ".config").is_ok());
    }
}
