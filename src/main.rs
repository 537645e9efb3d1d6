use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod hooks;
mod paths;

use hooks::{
    CompletedCommand, HookStatus, HookSynchronizer, LifecycleEvent, Marker, SyncReport, SyncSession,
};

/// enforce-hooks - keep a repository's git hooks in line with a bundled set
#[derive(Parser)]
#[command(name = "enforce-hooks")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Install bundled git hooks into a repository", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to .enforce-hooks.toml in the repository root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Repository root (defaults to `git rev-parse --show-toplevel`)
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    /// Directory containing the bundled hooks directory
    #[arg(long, global = true)]
    plugin_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Package installed: copy bundled hooks into .git/hooks
    Install,

    /// Package updated: copy bundled hooks that are not present yet
    Update,

    /// Package about to be removed: delete managed hooks
    Uninstall,

    /// Replay a JSON array of lifecycle events as one run
    Run {
        /// Event file, or "-" for stdin
        #[arg(long, default_value = "-")]
        events: String,
    },

    /// Show the state of each bundled hook in the repository
    Status,

    /// Write a default config file (to --config, or the repository root)
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let repo_root = paths::resolve_repo_root(cli.repo.as_deref())?;

    match &cli.command {
        Commands::Install => {
            let synchronizer = activate(&cli, repo_root)?;
            let tracked = synchronizer.tracked_package();
            run_lifecycle(
                &synchronizer,
                &[
                    LifecycleEvent::installed(tracked),
                    LifecycleEvent::completed(CompletedCommand::PostInstallCmd),
                ],
            )?;
        }
        Commands::Update => {
            let synchronizer = activate(&cli, repo_root)?;
            let tracked = synchronizer.tracked_package();
            run_lifecycle(
                &synchronizer,
                &[
                    LifecycleEvent::updated(tracked),
                    LifecycleEvent::completed(CompletedCommand::PostUpdateCmd),
                ],
            )?;
        }
        Commands::Uninstall => {
            let synchronizer = activate(&cli, repo_root)?;
            let tracked = synchronizer.tracked_package();
            run_lifecycle(&synchronizer, &[LifecycleEvent::uninstalling(tracked)])?;
        }
        Commands::Run { events } => {
            let synchronizer = activate(&cli, repo_root)?;
            let events = read_events(events)?;
            run_lifecycle(&synchronizer, &events)?;
        }
        Commands::Status => {
            let synchronizer = activate(&cli, repo_root)?;
            show_status(&synchronizer)?;
        }
        Commands::Init => {
            init_config(cli.config.as_deref(), &repo_root)?;
        }
    }

    Ok(())
}

/// Resolve paths and settings once for the whole process
fn activate(cli: &Cli, repo_root: PathBuf) -> Result<HookSynchronizer> {
    let config = config::resolve_config(cli.config.as_deref(), &repo_root)?;
    let plugin_dir = paths::resolve_plugin_dir(cli.plugin_dir.as_deref())?;
    let source_dir = plugin_dir.join(&config.source_dir);
    let marker = Marker::new(&config.marker)?;

    let hook_paths = paths::HookPaths::new(repo_root, source_dir);
    debug!("Source hooks: {:?}", hook_paths.source_dir);
    debug!("Destination hooks: {:?}", hook_paths.dest_dir);

    Ok(HookSynchronizer::new(hook_paths, config.package_name, marker))
}

/// Feed events through one session; fail if any file could not be handled
fn run_lifecycle(synchronizer: &HookSynchronizer, events: &[LifecycleEvent]) -> Result<()> {
    let mut session = SyncSession::new();
    let mut failures = 0;

    for event in events {
        if let Some(report) = synchronizer.dispatch(&mut session, event)? {
            print_report(&report);
            if report.has_failures() {
                failures += report.failed.len();
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!("{} hook(s) could not be synchronized", failures));
    }
    Ok(())
}

fn print_report(report: &SyncReport) {
    for name in &report.installed {
        println!("✅ Installed {}", name);
    }
    for name in &report.removed {
        println!("🗑️  Removed {}", name);
    }
    for name in &report.kept {
        println!("📋 Kept {} (not managed by enforce-hooks)", name);
    }
    for (name, err) in &report.failed {
        println!("⚠️  {}: {}", name, err);
    }
}

fn read_events(source: &str) -> Result<Vec<LifecycleEvent>> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read events from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read events from {}", source))?
    };

    let events: Vec<LifecycleEvent> =
        serde_json::from_str(&content).context("Invalid lifecycle event stream")?;
    info!("Replaying {} lifecycle events", events.len());
    Ok(events)
}

fn show_status(synchronizer: &HookSynchronizer) -> Result<()> {
    let statuses = synchronizer.status()?;

    let paths = synchronizer.paths();
    println!("Repository: {}", paths.repo_root.display());
    println!("Hooks in {}", paths.dest_dir.display());
    println!();
    for (name, status) in statuses {
        let label = match status {
            HookStatus::Managed => "✅ Managed",
            HookStatus::Foreign => "⚠️  Foreign (no marker)",
            HookStatus::Missing => "❌ Missing",
            HookStatus::Unreadable => "⚠️  Unreadable",
        };
        println!("{:<24} {}", name, label);
    }
    Ok(())
}

fn init_config(explicit: Option<&Path>, repo_root: &Path) -> Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => repo_root.join(config::PROJECT_CONFIG_FILE),
    };
    if path.exists() {
        println!("📋 {} already exists", path.display());
        return Ok(());
    }

    config::save_config(&config::HooksConfig::default(), &path)?;
    info!("Wrote default config to {:?}", path);
    println!("✅ Wrote {}", path.display());
    Ok(())
}
