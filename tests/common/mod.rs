#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Creates `<root>/steamapps/common/<folder>` for each folder and one
/// manifest per installdir.
pub fn make_library(root: &Path, folders: &[&str], installdirs: &[&str]) {
    let steamapps = root.join("steamapps");
    fs::create_dir_all(steamapps.join("common")).unwrap();

    for folder in folders {
        let dir = steamapps.join("common").join(folder);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("game.bin"), vec![0u8; 2048]).unwrap();
    }

    for (i, installdir) in installdirs.iter().enumerate() {
        write_manifest(&steamapps, &format!("{}", 100 + i), installdir);
    }
}

pub fn write_manifest(steamapps: &Path, appid: &str, installdir: &str) {
    fs::write(
        steamapps.join(format!("appmanifest_{}.acf", appid)),
        format!(
            "\"AppState\"\n{{\n\t\"appid\"\t\t\"{}\"\n\t\"name\"\t\t\"{}\"\n\t\"installdir\"\t\t\"{}\"\n}}\n",
            appid, installdir, installdir
        ),
    )
    .unwrap();
}

/// Writes a `libraryfolders.vdf` listing `paths` into `root`'s steamapps.
pub fn write_library_folders(root: &Path, paths: &[PathBuf]) {
    let mut text = String::from("\"libraryfolders\"\n{\n");
    for (i, path) in paths.iter().enumerate() {
        let escaped = path.display().to_string().replace('\\', "\\\\");
        text.push_str(&format!(
            "\t\"{}\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t}}\n",
            i, escaped
        ));
    }
    text.push_str("}\n");
    fs::write(root.join("steamapps").join("libraryfolders.vdf"), text).unwrap();
}

pub fn common(root: &Path, folder: &str) -> PathBuf {
    root.join("steamapps").join("common").join(folder)
}
