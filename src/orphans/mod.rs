//! Orphan detection.
//!
//! Every folder under `steamapps/common` is classified against the
//! library's manifests and the user's keep-list. Folder names are compared
//! case-insensitively on both sides.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::discover::LibraryRoot;
use crate::manifest::{self, SkippedManifest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// A manifest's `installdir` names this folder.
    Registered,
    /// Unregistered, but protected by the keep-list.
    Kept,
    /// Unregistered and unprotected.
    Orphan,
}

/// Folder names the user never wants touched.
#[derive(Debug, Clone, Default)]
pub struct KeepList {
    names: HashSet<String>,
}

impl KeepList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct InstalledFolder {
    pub name: String,
    pub path: PathBuf,
    pub class: Classification,
}

/// The classified contents of one library.
#[derive(Debug)]
pub struct LibraryScan {
    pub library: LibraryRoot,
    /// Sorted by name.
    pub folders: Vec<InstalledFolder>,
    pub skipped: Vec<SkippedManifest>,
}

impl LibraryScan {
    pub fn orphans(&self) -> impl Iterator<Item = &InstalledFolder> {
        self.folders
            .iter()
            .filter(|f| f.class == Classification::Orphan)
    }

    pub fn count(&self, class: Classification) -> usize {
        self.folders.iter().filter(|f| f.class == class).count()
    }
}

#[derive(Debug, Clone)]
pub struct OrphanCandidate {
    pub library: LibraryRoot,
    pub name: String,
    pub path: PathBuf,
    /// Best-effort total of file sizes beneath `path`.
    pub size: u64,
}

pub fn classify(name: &str, registered: &HashSet<String>, keep: &KeepList) -> Classification {
    if registered.contains(&name.to_lowercase()) {
        Classification::Registered
    } else if keep.contains(name) {
        Classification::Kept
    } else {
        Classification::Orphan
    }
}

/// Reads the manifests and installed folders of one library and classifies
/// each folder.
///
/// A library without `steamapps/common` scans as empty. Failing to list
/// `steamapps` or `common` is an error for this library only.
pub fn scan_library(library: &LibraryRoot, keep: &KeepList) -> Result<LibraryScan> {
    let manifests = manifest::read_manifest_dir(library.steamapps())?;
    let registered: HashSet<String> = manifests
        .entries
        .iter()
        .map(|m| m.installdir.to_lowercase())
        .collect();

    let mut folders = Vec::new();
    let common = library.common();
    if common.is_dir() {
        for entry in fs::read_dir(&common)
            .with_context(|| format!("Failed to list {}", common.display()))?
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry in {}: {}", common.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let class = classify(&name, &registered, keep);
            log::debug!("{} -> {:?}", path.display(), class);
            folders.push(InstalledFolder { name, path, class });
        }
    } else {
        log::debug!("{} has no common folder", library.path().display());
    }
    folders.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(LibraryScan {
        library: library.clone(),
        folders,
        skipped: manifests.skipped,
    })
}

/// Orphan candidates across all scans, in scan order, with sizes filled in.
pub fn find_orphans(scans: &[LibraryScan]) -> Vec<OrphanCandidate> {
    scans
        .iter()
        .flat_map(|scan| {
            scan.orphans().map(move |folder| OrphanCandidate {
                library: scan.library.clone(),
                name: folder.name.clone(),
                path: folder.path.clone(),
                size: folder_size(&folder.path),
            })
        })
        .collect()
}

/// Sum of file sizes under `path`. Unreadable entries count as zero.
pub fn folder_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.metadata().map(|m| m.len()).unwrap_or(0))
        .sum()
}
