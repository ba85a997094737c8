//! One complete pass: discover, classify, report, confirm, remove.

use anyhow::Result;

use crate::discover::{self, DiscoverOpts};
use crate::orphans::{self, KeepList};
use crate::remove::{self, Confirm, RemovalReport, Trash};
use crate::report;
use crate::ui;

#[derive(Debug, Clone)]
pub struct SweepOpts {
    pub discover: DiscoverOpts,
    pub keep: KeepList,
    /// Report only; never prompt and never move anything.
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum Outcome {
    NothingToDo,
    DryRun { candidates: usize, bytes: u64 },
    Declined { candidates: usize },
    Removed(RemovalReport),
}

/// Runs a full sweep.
///
/// The only errors returned are startup failures: an unusable search root,
/// or no library under it. Everything after that is reported per item.
pub fn run(
    opts: &SweepOpts,
    confirm: &mut dyn Confirm,
    trash: &mut dyn Trash,
) -> Result<Outcome> {
    let libraries = discover::discover(&opts.discover)?;
    if libraries.is_empty() {
        anyhow::bail!(
            "No Steam, SteamLibrary or steamapps folder found under {}",
            opts.discover.search_root.display()
        );
    }
    report::print_libraries(&libraries);

    let mut scans = Vec::with_capacity(libraries.len());
    for library in &libraries {
        match orphans::scan_library(library, &opts.keep) {
            Ok(scan) => {
                report::print_scan(&scan);
                scans.push(scan);
            }
            Err(e) => ui::warn(&format!(
                "Skipping library {}: {:#}",
                library.path().display(),
                e
            )),
        }
    }

    let spinner = ui::spinner("Measuring folder sizes...");
    let candidates = orphans::find_orphans(&scans);
    spinner.finish_and_clear();

    if candidates.is_empty() {
        ui::success("No orphaned game folders found");
        return Ok(Outcome::NothingToDo);
    }
    report::print_candidates(&candidates);
    let bytes = report::total_size(&candidates);

    if opts.dry_run {
        ui::hint("Dry run: nothing was moved. Run without --dry-run to move these folders to the trash.");
        return Ok(Outcome::DryRun {
            candidates: candidates.len(),
            bytes,
        });
    }

    let prompt = format!(
        "Move {} folder(s) ({}) to the trash?",
        candidates.len(),
        ui::format_bytes(bytes)
    );
    if !confirm.confirm(&prompt) {
        ui::info("Cancelled, nothing was moved");
        return Ok(Outcome::Declined {
            candidates: candidates.len(),
        });
    }

    let removal = remove::remove_orphans(&candidates, trash);
    report::print_summary(&removal);
    Ok(Outcome::Removed(removal))
}
