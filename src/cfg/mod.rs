use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::discover::DEFAULT_MAX_DEPTH;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Where to start looking for libraries (defaults to the executable's directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_root: Option<PathBuf>,

    /// Folder names under steamapps/common that are never treated as orphans
    #[serde(default)]
    pub keep: Vec<String>,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Also scan the libraries listed in libraryfolders.vdf
    #[serde(default = "default_follow_library_folders")]
    pub follow_library_folders: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            search_root: None,
            keep: Vec::new(),
            max_depth: default_max_depth(),
            follow_library_folders: default_follow_library_folders(),
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_follow_library_folders() -> bool {
    true
}

/// `<config dir>/steamsweep/config.toml`, if the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("steamsweep").join("config.toml"))
}

pub fn load(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        anyhow::bail!("Config not found at {}", config_path.display());
    }

    let contents = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
    let mut config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;

    if let Some(root) = &config.search_root {
        let expanded = shellexpand::tilde(&root.to_string_lossy()).into_owned();
        config.search_root = Some(PathBuf::from(expanded));
    }

    Ok(config)
}

/// Loads `explicit` if given (it must exist), otherwise the default config
/// file if one is present, otherwise built-in defaults.
pub fn load_or_default(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load(path);
    }

    match default_path() {
        Some(path) if path.is_file() => {
            log::debug!("Using config file {}", path.display());
            load(&path)
        }
        _ => Ok(Config::default()),
    }
}
