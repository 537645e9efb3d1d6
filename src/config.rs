//! Configuration for enforce-hooks
//!
//! Settings are read from a TOML file. A project-level `.enforce-hooks.toml`
//! in the repository root wins over the user-level file in the config
//! directory; when neither exists the built-in defaults apply.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

/// Package whose lifecycle events trigger hook synchronization
pub const DEFAULT_PACKAGE_NAME: &str = "tschuermans/enforce-hooks";

/// Marker comment identifying hooks installed by this tool
pub const DEFAULT_MARKER: &str = "# custom-hook";

/// Name of the project-level config file
pub const PROJECT_CONFIG_FILE: &str = ".enforce-hooks.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Tracked package name
    pub package_name: String,
    /// Hook source directory, relative to the plugin directory
    pub source_dir: PathBuf,
    /// Marker token that flags a hook as managed
    pub marker: String,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            source_dir: PathBuf::from("hooks"),
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

/// Load configuration from file, falling back to defaults when it is missing
pub fn load_config(config_path: &Path) -> Result<HooksConfig> {
    if !config_path.exists() {
        return Ok(HooksConfig::default());
    }

    let content = std::fs::read_to_string(config_path)?;
    let config: HooksConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &HooksConfig, config_path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(config_path, content)?;
    Ok(())
}

/// Pick the config file to use for a repository
///
/// Returns `None` when no config file exists anywhere, in which case the
/// caller should use `HooksConfig::default()`.
pub fn find_config(repo_root: &Path) -> Option<PathBuf> {
    let project = repo_root.join(PROJECT_CONFIG_FILE);
    if project.exists() {
        return Some(project);
    }

    let user = dirs::config_dir()?.join("enforce-hooks").join("config.toml");
    if user.exists() {
        return Some(user);
    }

    None
}

/// Resolve configuration: explicit path first, then the lookup chain
pub fn resolve_config(explicit: Option<&Path>, repo_root: &Path) -> Result<HooksConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config(repo_root),
    };

    match path {
        Some(path) => {
            debug!("Loading config from {:?}", path);
            load_config(&path)
        }
        None => {
            debug!("No config file found, using defaults");
            Ok(HooksConfig::default())
        }
    }
}
