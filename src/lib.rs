//! Steamsweep - find game folders Steam left behind and move them to the trash.
//!
//! Steam deletes a game's `appmanifest_*.acf` on uninstall but sometimes
//! leaves its folder under `steamapps/common`. This library provides:
//! - App manifest and library-folders parsing
//! - Library discovery from a search root
//! - Orphan detection against manifests and a keep-list
//! - Confirmed, recoverable removal through the system trash

pub mod cfg;
pub mod discover;
pub mod manifest;
pub mod orphans;
pub mod remove;
pub mod report;
pub mod sweep;
pub mod ui;
