//! Installer error taxonomy
//!
//! Every variant is terminal for the current run. Nothing is retried and
//! nothing already done is rolled back.

use thiserror::Error;

/// Failure of one pipeline stage
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstallerError {
    /// One or more required tools do not resolve on the search path.
    /// Always lists every missing tool, never just the first.
    #[error("missing dependencies: {}", .0.join(", "))]
    MissingDependency(Vec<String>),

    /// Local checkout not found and the shallow clone failed
    #[error("failed to acquire source: {0}")]
    Acquisition(String),

    /// Non-zero build exit, or the expected artifact is absent
    #[error("build failed: {0}")]
    Build(String),

    /// Filesystem, permission or search-path failure while deploying
    #[error("installation failed: {0}")]
    Install(String),

    /// Staging, script generation or makensis failure
    #[error("packaging failed: {0}")]
    Package(String),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

impl InstallerError {
    /// Short stage label used in status lines and dialog titles
    pub fn title(&self) -> &'static str {
        match self {
            Self::MissingDependency(_) => "Missing Dependencies",
            Self::Acquisition(_) => "Download Error",
            Self::Build(_) => "Build Error",
            Self::Install(_) => "Install Error",
            Self::Package(_) => "Packaging Error",
            Self::UnsupportedPlatform(_) => "Unsupported Platform",
        }
    }
}

pub type Result<T, E = InstallerError> = std::result::Result<T, E>;
