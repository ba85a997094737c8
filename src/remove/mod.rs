//! Confirmation and removal of orphan candidates.
//!
//! Both the question asked of the user and the trash operation sit behind
//! traits so a run can be driven without a console or a real trash can.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use crate::orphans::OrphanCandidate;
use crate::ui;

/// Answers the single "go ahead?" question before anything is moved.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Asks on the terminal; declines when there is none.
pub struct Interactive;

impl Confirm for Interactive {
    fn confirm(&mut self, prompt: &str) -> bool {
        ui::prompt_confirm(prompt, false)
    }
}

/// Always accepts (`--yes`).
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Moves a directory tree somewhere the user can still recover it from.
pub trait Trash {
    fn trash(&mut self, path: &Path) -> Result<()>;
}

/// The platform recycle bin / trash can.
pub struct SystemTrash;

impl Trash for SystemTrash {
    fn trash(&mut self, path: &Path) -> Result<()> {
        trash::delete(path)
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("Failed to move {} to the trash", path.display()))
    }
}

#[derive(Debug, Clone)]
pub struct RemovalFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct RemovalReport {
    pub trashed: Vec<PathBuf>,
    pub failed: Vec<RemovalFailure>,
}

impl RemovalReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Trashes each candidate in turn. A failure is recorded and reported for
/// that folder alone; the remaining candidates are still processed.
pub fn remove_orphans(candidates: &[OrphanCandidate], trash: &mut dyn Trash) -> RemovalReport {
    let mut report = RemovalReport::default();

    for candidate in candidates {
        match trash.trash(&candidate.path) {
            Ok(()) => {
                ui::success(&format!("Moved {} to the trash", candidate.path.display()));
                report.trashed.push(candidate.path.clone());
            }
            Err(e) => {
                ui::error(&format!("{:#}", e));
                report.failed.push(RemovalFailure {
                    path: candidate.path.clone(),
                    reason: format!("{:#}", e),
                });
            }
        }
    }

    report
}
