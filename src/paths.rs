//! Path resolution for the plugin and the target repository
//!
//! Paths are resolved once at startup and never change afterwards.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::{HookError, Result};

/// Environment variable overriding the plugin directory
pub const PLUGIN_DIR_ENV: &str = "ENFORCE_HOOKS_PLUGIN_DIR";

/// Source and destination directories for hook synchronization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookPaths {
    /// Top-level directory of the repository
    pub repo_root: PathBuf,
    /// Bundled hooks (read-only)
    pub source_dir: PathBuf,
    /// `<repo_root>/.git/hooks` (read-write)
    pub dest_dir: PathBuf,
}

impl HookPaths {
    pub fn new(repo_root: PathBuf, source_dir: PathBuf) -> Self {
        let dest_dir = repo_root.join(".git").join("hooks");
        Self {
            repo_root,
            source_dir,
            dest_dir,
        }
    }
}

/// Determine the repository root, either given explicitly or via git
pub fn resolve_repo_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return absolutize(path);
    }

    let cwd = std::env::current_dir()?;
    let output = run_git_command(&cwd, &["rev-parse", "--show-toplevel"])?;
    let root = trim_separators(output.trim());
    if root.is_empty() {
        return Err(HookError::RepositoryRoot(
            "git rev-parse returned an empty path".to_string(),
        ));
    }

    debug!("Repository root: {}", root);
    Ok(PathBuf::from(root))
}

/// Determine the plugin directory holding the bundled hooks
pub fn resolve_plugin_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return absolutize(path);
    }

    if let Ok(dir) = std::env::var(PLUGIN_DIR_ENV) {
        if !dir.is_empty() {
            return absolutize(Path::new(&dir));
        }
    }

    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| HookError::Io(std::io::Error::other("executable has no parent directory")))
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn trim_separators(path: &str) -> &str {
    let trimmed = path.trim_end_matches(std::path::MAIN_SEPARATOR);
    // Keep "/" intact
    if trimmed.is_empty() && !path.is_empty() {
        &path[..1]
    } else {
        trimmed
    }
}

/// Run a git command and return stdout
fn run_git_command(cwd: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| HookError::RepositoryRoot(format!("failed to execute git: {}", e)))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(HookError::RepositoryRoot(format!(
            "git {} failed: {}",
            args.join(" "),
            stderr.trim()
        )))
    }
}
