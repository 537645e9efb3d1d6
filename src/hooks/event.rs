//! Package lifecycle events delivered by the host package manager

use serde::{Deserialize, Serialize};

/// A package as seen by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }
}

/// The operation a package event carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PackageOperation {
    Install { package: Package },
    Update { initial: Package, target: Package },
    Uninstall { package: Package },
}

impl PackageOperation {
    /// The package affected by this operation (the target for updates)
    pub fn package(&self) -> &Package {
        match self {
            PackageOperation::Install { package } => package,
            PackageOperation::Update { target, .. } => target,
            PackageOperation::Uninstall { package } => package,
        }
    }

    pub fn is_removal(&self) -> bool {
        matches!(self, PackageOperation::Uninstall { .. })
    }
}

/// Host command whose completion ends a lifecycle run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletedCommand {
    PostInstallCmd,
    PostUpdateCmd,
}

/// Every event the synchronizer reacts to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum LifecycleEvent {
    PackageInstalled { operation: PackageOperation },
    PackageUpdated { operation: PackageOperation },
    PackageUninstalling { operation: PackageOperation },
    LifecycleCompleted { command: CompletedCommand },
}

impl LifecycleEvent {
    pub fn installed(name: &str) -> Self {
        LifecycleEvent::PackageInstalled {
            operation: PackageOperation::Install {
                package: Package::new(name),
            },
        }
    }

    pub fn updated(name: &str) -> Self {
        LifecycleEvent::PackageUpdated {
            operation: PackageOperation::Update {
                initial: Package::new(name),
                target: Package::new(name),
            },
        }
    }

    pub fn uninstalling(name: &str) -> Self {
        LifecycleEvent::PackageUninstalling {
            operation: PackageOperation::Uninstall {
                package: Package::new(name),
            },
        }
    }

    pub fn completed(command: CompletedCommand) -> Self {
        LifecycleEvent::LifecycleCompleted { command }
    }

    /// Operation carried by package events
    pub fn operation(&self) -> Option<&PackageOperation> {
        match self {
            LifecycleEvent::PackageInstalled { operation }
            | LifecycleEvent::PackageUpdated { operation }
            | LifecycleEvent::PackageUninstalling { operation } => Some(operation),
            LifecycleEvent::LifecycleCompleted { .. } => None,
        }
    }
}
