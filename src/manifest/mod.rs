//! App manifests and the library-folders registry.
//!
//! Steam writes one `appmanifest_<appid>.acf` per installed game into a
//! library's `steamapps` directory and removes it again on uninstall. The
//! `installdir` value names the folder under `steamapps/common` the game
//! lives in. `libraryfolders.vdf` lists every library Steam knows about.

use anyhow::{Context, Result};
use keyvalues_parser::{Value, Vdf};
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MANIFEST_PREFIX: &str = "appmanifest_";
pub const MANIFEST_EXTENSION: &str = "acf";
pub const LIBRARY_FOLDERS_FILE: &str = "libraryfolders.vdf";

/// A quoted key followed by a quoted value on the same logical line.
const PAIR_PATTERN: &str = r#""(?P<key>[^"]+)"\s+"(?P<value>[^"]*)""#;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read file: {0}")]
    Read(#[from] io::Error),

    #[error("malformed key-value text: {0}")]
    Parse(String),

    #[error("manifest has no \"{0}\" entry")]
    MissingKey(&'static str),
}

/// The fields of an app manifest this tool cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub appid: String,
    pub installdir: String,
    pub name: String,
}

/// A manifest file that could not be used.
#[derive(Debug)]
pub struct SkippedManifest {
    pub path: PathBuf,
    pub error: ManifestError,
}

/// Every manifest found directly under one `steamapps` directory.
#[derive(Debug, Default)]
pub struct ManifestSet {
    pub entries: Vec<ManifestEntry>,
    pub skipped: Vec<SkippedManifest>,
}

/// Reads `appid`, `installdir` and `name` from manifest text.
///
/// Well-formed files are read as a tree and only the direct children of
/// `AppState` count. A file the tree parser rejects (a truncated write, a
/// stray brace) is scanned pair by pair instead, so a game whose keys are
/// intact stays registered. Only a missing `appid` or `installdir` makes a
/// manifest unusable.
pub fn parse_manifest(text: &str) -> Result<ManifestEntry, ManifestError> {
    let fields: Vec<(String, String)> = match Vdf::parse(text) {
        Ok(vdf) => top_level_strings(&vdf),
        Err(e) => {
            log::debug!("Manifest is not well-formed ({}), scanning key by key", e);
            flat_pairs(text)
        }
    };

    let lookup = |key: &str| {
        fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    Ok(ManifestEntry {
        appid: lookup("appid").ok_or(ManifestError::MissingKey("appid"))?,
        installdir: lookup("installdir").ok_or(ManifestError::MissingKey("installdir"))?,
        name: lookup("name").unwrap_or_default(),
    })
}

pub fn load_manifest(path: &Path) -> Result<ManifestEntry, ManifestError> {
    let bytes = fs::read(path)?;
    parse_manifest(&String::from_utf8_lossy(&bytes))
}

/// True for file names of the form `appmanifest_*.acf`.
pub fn is_manifest_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.to_ascii_lowercase().starts_with(MANIFEST_PREFIX)
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(MANIFEST_EXTENSION))
}

/// Loads every manifest directly under `steamapps`.
///
/// Individual files that fail to read or parse end up in
/// [`ManifestSet::skipped`]; only a failure to list the directory itself is
/// returned as an error.
pub fn read_manifest_dir(steamapps: &Path) -> Result<ManifestSet> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(steamapps)
        .with_context(|| format!("Failed to list {}", steamapps.display()))?
    {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && is_manifest_file(&path) {
                    paths.push(path);
                }
            }
            Err(e) => log::warn!("Skipping unreadable entry in {}: {}", steamapps.display(), e),
        }
    }
    paths.sort();

    let mut set = ManifestSet::default();
    for path in paths {
        match load_manifest(&path) {
            Ok(entry) => {
                log::debug!("{} -> installdir {:?}", path.display(), entry.installdir);
                set.entries.push(entry);
            }
            Err(error) => {
                log::debug!("Skipping manifest {}: {}", path.display(), error);
                set.skipped.push(SkippedManifest { path, error });
            }
        }
    }

    Ok(set)
}

/// Extracts library paths from `libraryfolders.vdf` text.
///
/// Current Steam clients write numbered blocks carrying a `"path"` key;
/// older ones map the number straight to the path. Both are accepted.
pub fn parse_library_folders(text: &str) -> Result<Vec<PathBuf>, ManifestError> {
    let vdf = Vdf::parse(text).map_err(|e| ManifestError::Parse(e.to_string()))?;
    let Value::Obj(folders) = &vdf.value else {
        return Ok(Vec::new());
    };

    let mut paths = Vec::new();
    for (key, values) in folders.iter() {
        for value in values {
            let path = match value {
                Value::Str(path) if is_library_index(key) => Some(path.as_ref()),
                Value::Obj(folder) => folder
                    .iter()
                    .filter(|(k, _)| k.eq_ignore_ascii_case("path"))
                    .flat_map(|(_, v)| v.iter())
                    .find_map(|v| match v {
                        Value::Str(s) => Some(s.as_ref()),
                        _ => None,
                    }),
                _ => None,
            };
            if let Some(path) = path.map(str::trim).filter(|p| !p.is_empty()) {
                paths.push(PathBuf::from(shellexpand::tilde(path).into_owned()));
            }
        }
    }

    Ok(paths)
}

/// Places a library root may keep its `libraryfolders.vdf`, newest layout first.
pub fn library_folders_files(root: &Path, steamapps: &Path) -> [PathBuf; 2] {
    [
        steamapps.join(LIBRARY_FOLDERS_FILE),
        root.join("config").join(LIBRARY_FOLDERS_FILE),
    ]
}

fn is_library_index(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_digit())
}

/// String values directly under the root block, in document order.
fn top_level_strings(vdf: &Vdf<'_>) -> Vec<(String, String)> {
    let Value::Obj(root) = &vdf.value else {
        return Vec::new();
    };
    root.iter()
        .flat_map(|(key, values)| {
            values.iter().filter_map(move |value| match value {
                Value::Str(s) => Some((key.to_string(), s.to_string())),
                _ => None,
            })
        })
        .collect()
}

/// Every `"key" "value"` pair in the text regardless of nesting.
fn flat_pairs(text: &str) -> Vec<(String, String)> {
    let Ok(pattern) = Regex::new(PAIR_PATTERN) else {
        return Vec::new();
    };
    pattern
        .captures_iter(text)
        .map(|caps| (caps["key"].to_string(), caps["value"].replace(r"\\", r"\")))
        .collect()
}
