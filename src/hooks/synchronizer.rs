//! Hook synchronization between the bundled hook directory and `.git/hooks`
//!
//! Installation never overwrites an existing hook. Removal only deletes
//! hooks carrying the marker. Per-file failures are logged and collected
//! in the report; they do not stop the remaining files.

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::event::LifecycleEvent;
use super::hook_file::{list_hook_files, HookFile, Marker, SourceHook};
use super::session::{Decision, SyncSession};
use crate::error::{HookError, Result};
use crate::paths::HookPaths;

/// Outcome of an install or removal pass
#[derive(Debug, Default)]
pub struct SyncReport {
    pub installed: Vec<String>,
    /// Already present at the destination
    pub skipped: Vec<String>,
    pub removed: Vec<String>,
    /// Present at the destination without the marker
    pub kept: Vec<String>,
    pub failed: Vec<(String, HookError)>,
}

impl SyncReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    fn fail(&mut self, name: String, err: HookError) {
        warn!("{}: {}", name, err);
        self.failed.push((name, err));
    }
}

/// State of a bundled hook in the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStatus {
    /// Present and carrying the marker
    Managed,
    /// Present without the marker
    Foreign,
    Missing,
    /// Present but could not be read
    Unreadable,
}

pub struct HookSynchronizer {
    paths: HookPaths,
    tracked_package: String,
    marker: Marker,
}

impl HookSynchronizer {
    pub fn new(paths: HookPaths, tracked_package: impl Into<String>, marker: Marker) -> Self {
        Self {
            paths,
            tracked_package: tracked_package.into(),
            marker,
        }
    }

    pub fn paths(&self) -> &HookPaths {
        &self.paths
    }

    pub fn tracked_package(&self) -> &str {
        &self.tracked_package
    }

    /// Handle one lifecycle event
    ///
    /// Returns a report when the event caused a filesystem pass.
    pub fn dispatch(
        &self,
        session: &mut SyncSession,
        event: &LifecycleEvent,
    ) -> Result<Option<SyncReport>> {
        match event.operation() {
            Some(operation) => match session.observe(&self.tracked_package, operation) {
                Decision::Ignore => Ok(None),
                Decision::InstallPending => {
                    debug!("{} installed, hooks pending", self.tracked_package);
                    Ok(None)
                }
                Decision::RemoveNow => {
                    info!("{} is being removed, cleaning up hooks", self.tracked_package);
                    self.remove_managed_hooks().map(Some)
                }
            },
            None => self.finalize_lifecycle(session),
        }
    }

    /// Install hooks if the session saw an install or update
    pub fn finalize_lifecycle(&self, session: &mut SyncSession) -> Result<Option<SyncReport>> {
        if session.take_pending() {
            self.install_hooks().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Copy every bundled hook that is not yet present and make it executable
    pub fn install_hooks(&self) -> Result<SyncReport> {
        let hooks = list_hook_files(&self.paths.source_dir)?;
        let mut report = SyncReport::default();

        if !hooks.is_empty() {
            std::fs::create_dir_all(&self.paths.dest_dir).map_err(|source| HookError::Write {
                path: self.paths.dest_dir.clone(),
                source,
            })?;
        }

        for hook in &hooks {
            let name = hook.name().into_owned();
            let dest = self.paths.dest_dir.join(&hook.file_name);

            if exists(&dest) {
                println!("{} already exists, skipping ...", name);
                report.skipped.push(name);
                continue;
            }

            match self.install_one(hook, &dest) {
                Ok(()) => {
                    info!("Installed {} hook", name);
                    report.installed.push(name);
                }
                Err(e) => report.fail(name, e),
            }
        }

        Ok(report)
    }

    fn install_one(&self, hook: &SourceHook, dest: &Path) -> Result<()> {
        let source = HookFile::read(&hook.path, &self.marker)?;
        if !source.managed {
            debug!(
                "{} does not carry {:?}; it will not be removed on uninstall",
                hook.name(),
                self.marker.token()
            );
        }
        write_executable(dest, &source.content)
    }

    /// Delete installed hooks that carry the marker
    pub fn remove_managed_hooks(&self) -> Result<SyncReport> {
        let hooks = list_hook_files(&self.paths.source_dir)?;
        let mut report = SyncReport::default();

        for hook in &hooks {
            let name = hook.name().into_owned();
            let dest = self.paths.dest_dir.join(&hook.file_name);

            if !exists(&dest) {
                continue;
            }

            let installed = match HookFile::read(&dest, &self.marker) {
                Ok(installed) => installed,
                Err(e) => {
                    report.fail(name, e);
                    continue;
                }
            };

            if !installed.managed {
                debug!("Keeping {}: no marker", name);
                report.kept.push(name);
                continue;
            }

            match std::fs::remove_file(&dest) {
                Ok(()) => {
                    info!("Removed {} hook", name);
                    report.removed.push(name);
                }
                Err(source) => report.fail(
                    name,
                    HookError::Remove {
                        path: dest.clone(),
                        source,
                    },
                ),
            }
        }

        Ok(report)
    }

    /// Report how each bundled hook looks in the repository
    pub fn status(&self) -> Result<Vec<(String, HookStatus)>> {
        let hooks = list_hook_files(&self.paths.source_dir)?;
        let mut statuses = Vec::with_capacity(hooks.len());

        for hook in &hooks {
            let dest = self.paths.dest_dir.join(&hook.file_name);
            let status = if !exists(&dest) {
                HookStatus::Missing
            } else {
                match HookFile::read(&dest, &self.marker) {
                    Ok(installed) if installed.managed => HookStatus::Managed,
                    Ok(_) => HookStatus::Foreign,
                    Err(e) => {
                        warn!("{}: {}", hook.name(), e);
                        HookStatus::Unreadable
                    }
                }
            };
            statuses.push((hook.name().into_owned(), status));
        }

        Ok(statuses)
    }
}

/// Existence check that also counts dangling symlinks
fn exists(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

/// Write through a uniquely named temp file, then link it into place
///
/// The final step fails instead of replacing `dest` if something appeared
/// there in the meantime. The temp file is removed when dropped.
fn write_executable(dest: &Path, content: &[u8]) -> Result<()> {
    let write_err = |source: std::io::Error| HookError::Write {
        path: dest.to_path_buf(),
        source,
    };

    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    set_executable(tmp.path()).map_err(write_err)?;
    tmp.persist_noclobber(dest).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
