//! Library discovery.
//!
//! Libraries are found two ways: by walking the search root for folders
//! named `Steam`, `SteamLibrary` or `steamapps`, and by following the paths
//! each library's `libraryfolders.vdf` points at.

use anyhow::{Context, Result};
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::manifest;

pub const STEAMAPPS: &str = "steamapps";
pub const COMMON: &str = "common";

/// Folder names (lowercased) that usually hold a `steamapps` directory.
const LIBRARY_DIR_NAMES: &[&str] = &["steam", "steamlibrary"];

pub const DEFAULT_MAX_DEPTH: usize = 3;

/// A directory with a `steamapps` subdirectory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LibraryRoot {
    path: PathBuf,
    steamapps: PathBuf,
}

impl LibraryRoot {
    /// Opens `path` as a library, or returns `None` when it is not one.
    ///
    /// The path is canonicalized so the same library reached through
    /// different spellings compares equal.
    pub fn open(path: &Path) -> Option<Self> {
        let path = fs::canonicalize(path).ok()?;
        let steamapps = find_steamapps(&path)?;
        Some(Self { path, steamapps })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn steamapps(&self) -> &Path {
        &self.steamapps
    }

    /// Where installed games live.
    pub fn common(&self) -> PathBuf {
        self.steamapps.join(COMMON)
    }
}

#[derive(Debug, Clone)]
pub struct DiscoverOpts {
    pub search_root: PathBuf,
    pub max_depth: usize,
    pub follow_library_folders: bool,
}

impl DiscoverOpts {
    pub fn new(search_root: impl Into<PathBuf>) -> Self {
        Self {
            search_root: search_root.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            follow_library_folders: true,
        }
    }
}

/// Finds every distinct library reachable from the search root, sorted by path.
///
/// Fails only when the search root itself is unusable.
pub fn discover(opts: &DiscoverOpts) -> Result<Vec<LibraryRoot>> {
    if !opts.search_root.is_dir() {
        anyhow::bail!(
            "Search root {} does not exist or is not a directory",
            opts.search_root.display()
        );
    }
    let search_root = fs::canonicalize(&opts.search_root)
        .with_context(|| format!("Failed to resolve {}", opts.search_root.display()))?;

    let mut queue: VecDeque<PathBuf> = scan_search_root(&search_root, opts.max_depth).into();
    let mut visited = HashSet::new();
    let mut libraries = Vec::new();

    while let Some(candidate) = queue.pop_front() {
        let Some(library) = LibraryRoot::open(&candidate) else {
            log::debug!("{} is not a Steam library", candidate.display());
            continue;
        };
        if !visited.insert(library.path().to_path_buf()) {
            continue;
        }

        if opts.follow_library_folders {
            queue.extend(read_library_folders(&library));
        }
        log::debug!("Found library {}", library.path().display());
        libraries.push(library);
    }

    libraries.sort();
    Ok(libraries)
}

/// Walks `root` (down to `max_depth` levels, symlinks not followed) and
/// returns candidate library roots.
///
/// A matched folder is not descended into, which keeps the walk out of
/// `steamapps/common` and its game data.
pub fn scan_search_root(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut walker = WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name == STEAMAPPS {
            if let Some(parent) = entry.path().parent() {
                found.push(parent.to_path_buf());
            }
            walker.skip_current_dir();
        } else if LIBRARY_DIR_NAMES.contains(&name.as_str())
            && find_steamapps(entry.path()).is_some()
        {
            found.push(entry.path().to_path_buf());
            walker.skip_current_dir();
        }
    }

    found
}

/// Library paths listed in `library`'s registry files that exist on disk.
pub fn read_library_folders(library: &LibraryRoot) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for file in manifest::library_folders_files(library.path(), library.steamapps()) {
        if !file.is_file() {
            continue;
        }
        let text = match fs::read(&file) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                log::warn!("Cannot read {}: {}", file.display(), e);
                continue;
            }
        };
        match manifest::parse_library_folders(&text) {
            Ok(listed) => {
                for path in listed {
                    if find_steamapps(&path).is_some() {
                        paths.push(path);
                    } else {
                        log::debug!(
                            "{} lists {}, which has no steamapps folder",
                            file.display(),
                            path.display()
                        );
                    }
                }
            }
            Err(e) => log::warn!("Ignoring malformed {}: {}", file.display(), e),
        }
    }

    paths
}

/// Locates the `steamapps` subdirectory of `root`, tolerating `SteamApps`
/// and other capitalizations on case-sensitive file systems.
fn find_steamapps(root: &Path) -> Option<PathBuf> {
    let direct = root.join(STEAMAPPS);
    if direct.is_dir() {
        return Some(direct);
    }

    fs::read_dir(root)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| {
            p.is_dir()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.eq_ignore_ascii_case(STEAMAPPS))
        })
}
