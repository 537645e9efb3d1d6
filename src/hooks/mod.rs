//! Git hook synchronization driven by package lifecycle events
//!
//! Install and update events for the tracked package mark a pending install
//! that runs when the host's lifecycle completes. An uninstall event removes
//! the managed hooks right away.

pub mod event;
pub mod hook_file;
pub mod session;
pub mod synchronizer;

pub use event::{CompletedCommand, LifecycleEvent};
pub use hook_file::Marker;
pub use session::SyncSession;
pub use synchronizer::{HookStatus, HookSynchronizer, SyncReport};
