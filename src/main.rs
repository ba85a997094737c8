use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use steamsweep::cfg;
use steamsweep::discover::DiscoverOpts;
use steamsweep::orphans::KeepList;
use steamsweep::remove::{AssumeYes, Interactive, SystemTrash};
use steamsweep::sweep::{self, Outcome, SweepOpts};
use steamsweep::ui;

/// Find game folders left behind in Steam libraries after uninstall and move them to the system trash
#[derive(Parser)]
#[command(name = "steamsweep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to search for Steam/SteamLibrary/steamapps folders (defaults to the executable's directory)
    #[arg(long, value_name = "PATH")]
    search_root: Option<PathBuf>,

    /// Folder names to always keep (repeatable or comma-separated)
    #[arg(long, value_name = "NAME", value_delimiter = ',')]
    keep: Vec<String>,

    /// Do not wait for Enter before exiting
    #[arg(long)]
    no_pause: bool,

    /// Move folders to the trash without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Only report orphaned folders, never move them
    #[arg(long)]
    dry_run: bool,

    /// How many directory levels below the search root to look for libraries
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Do not follow the library paths listed in libraryfolders.vdf
    #[arg(long)]
    no_library_folders: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (defaults to <config dir>/steamsweep/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    ui::init();

    let result = run(&cli);

    if let Err(e) = &result {
        ui::error(&format!("Error: {:#}", e));
    }
    if !cli.no_pause {
        ui::pause("Done. Press Enter to exit...");
    }
    if result.is_err() {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "steamsweep=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<Outcome> {
    let config = cfg::load_or_default(cli.config.as_deref())?;

    let search_root = match cli.search_root.clone().or(config.search_root.clone()) {
        Some(root) => root,
        None => default_search_root()?,
    };
    ui::info(&format!("Searching for Steam libraries under {}", search_root.display()));

    let mut discover = DiscoverOpts::new(search_root);
    discover.max_depth = cli.max_depth.unwrap_or(config.max_depth);
    discover.follow_library_folders = config.follow_library_folders && !cli.no_library_folders;

    let keep = KeepList::new(config.keep.iter().chain(cli.keep.iter()));
    if !keep.is_empty() {
        ui::info(&format!("Keeping {} folder name(s) regardless of manifests", keep.len()));
    }

    let opts = SweepOpts {
        discover,
        keep,
        dry_run: cli.dry_run,
    };

    if cli.yes {
        sweep::run(&opts, &mut AssumeYes, &mut SystemTrash)
    } else {
        sweep::run(&opts, &mut Interactive, &mut SystemTrash)
    }
}

fn default_search_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the running executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .context("Executable has no parent directory")
}
