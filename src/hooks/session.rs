//! Per-run state for one package-manager lifecycle

use tracing::debug;

use super::event::PackageOperation;

/// What a package event asks the synchronizer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Event concerns another package
    Ignore,
    /// Tracked package is being removed
    RemoveNow,
    /// Tracked package was installed or updated; install at lifecycle end
    InstallPending,
}

/// State for a single lifecycle run
///
/// Create one per run. `take_pending` hands the flag out once and resets it.
#[derive(Debug, Default)]
pub struct SyncSession {
    pending_install: bool,
}

impl SyncSession {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending_install
    }

    /// Record a package operation and decide what should happen
    pub fn observe(&mut self, tracked_package: &str, operation: &PackageOperation) -> Decision {
        let package = operation.package();
        if package.name != tracked_package {
            debug!("Ignoring event for {}", package.name);
            return Decision::Ignore;
        }

        if operation.is_removal() {
            self.pending_install = false;
            return Decision::RemoveNow;
        }

        self.pending_install = true;
        Decision::InstallPending
    }

    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending_install)
    }
}
