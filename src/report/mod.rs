//! Console report for a sweep.

use colored::*;

use crate::discover::LibraryRoot;
use crate::orphans::{Classification, LibraryScan, OrphanCandidate};
use crate::remove::RemovalReport;
use crate::ui;

/// Candidates grouped by library, keeping first-seen library order.
pub fn group_by_library(
    candidates: &[OrphanCandidate],
) -> Vec<(&LibraryRoot, Vec<&OrphanCandidate>)> {
    let mut groups: Vec<(&LibraryRoot, Vec<&OrphanCandidate>)> = Vec::new();
    for candidate in candidates {
        match groups.iter_mut().find(|(lib, _)| *lib == &candidate.library) {
            Some((_, members)) => members.push(candidate),
            None => groups.push((&candidate.library, vec![candidate])),
        }
    }
    groups
}

pub fn total_size(candidates: &[OrphanCandidate]) -> u64 {
    candidates.iter().map(|c| c.size).sum()
}

pub fn print_libraries(libraries: &[LibraryRoot]) {
    ui::info(&format!(
        "Found {} Steam {}",
        libraries.len(),
        plural(libraries.len(), "library", "libraries")
    ));
    for library in libraries {
        println!("  {}", library.path().display().to_string().dimmed());
    }
}

pub fn print_scan(scan: &LibraryScan) {
    log::debug!(
        "{}: {} registered, {} kept, {} orphaned",
        scan.library.path().display(),
        scan.count(Classification::Registered),
        scan.count(Classification::Kept),
        scan.count(Classification::Orphan)
    );
    for skipped in &scan.skipped {
        ui::warn(&format!(
            "Ignoring manifest {}: {}",
            skipped.path.display(),
            skipped.error
        ));
    }
}

pub fn print_candidates(candidates: &[OrphanCandidate]) {
    ui::section("Folders with no matching app manifest");
    for (library, members) in group_by_library(candidates) {
        println!("\n{} {}", "Library:".bold(), library.path().display());
        for candidate in members {
            println!(
                "  - {} ({})",
                candidate.path.display(),
                ui::format_bytes(candidate.size).cyan()
            );
        }
    }
    println!();
    ui::info(&format!(
        "{} {}, {} in total",
        candidates.len(),
        plural(candidates.len(), "folder", "folders"),
        ui::format_bytes(total_size(candidates))
    ));
}

pub fn print_summary(report: &RemovalReport) {
    if !report.trashed.is_empty() {
        ui::section("Moved to the trash");
        for path in &report.trashed {
            println!("  - {}", path.display());
        }
    }
    if !report.failed.is_empty() {
        ui::section("Could not be moved");
        for failure in &report.failed {
            println!("  - {} ({})", failure.path.display(), failure.reason.red());
        }
    }
    if report.trashed.is_empty() && report.failed.is_empty() {
        ui::info("Nothing was moved");
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}
