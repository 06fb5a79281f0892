//! GUI state types

use std::time::Duration;

use crate::error::InstallerError;
use crate::install::InstallReport;

/// Repaint interval while the pipeline runs in the background
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub const WINDOW_TITLE: &str = "Defacto Compiler Installer";

/// Where the window is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the user to press Install
    Ready,
    Running,
    Complete(InstallReport),
    Failed(InstallerError),
}

impl Phase {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}
