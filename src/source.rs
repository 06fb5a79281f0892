//! Source acquisition
//!
//! Reuses a local checkout when one is found next to the installer, otherwise
//! shallow-clones the upstream repository into a temporary directory that is
//! removed when the [`SourceLocation`] is released or dropped.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::command::{CommandSpec, ExternalCommand};
use crate::config::InstallerConfig;
use crate::detection::HostProfile;
use crate::environment::HostEnvironment;
use crate::error::{InstallerError, Result};
use crate::progress::{Stage, StatusSink, StatusUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    LocalReuse,
    FreshlyCloned,
}

/// Working copy of the compiler sources
#[derive(Debug)]
pub struct SourceLocation {
    path: PathBuf,
    origin: SourceOrigin,
    /// Owns the checkout when it was cloned; dropping it deletes the tree
    temp: Option<TempDir>,
}

impl SourceLocation {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            origin: SourceOrigin::LocalReuse,
            temp: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> SourceOrigin {
        self.origin
    }

    pub fn is_ephemeral(&self) -> bool {
        self.temp.is_some()
    }

    /// Remove an ephemeral checkout. Failures are logged and reported as a
    /// warning, never returned.
    pub fn release(self, status: &dyn StatusSink) {
        let Some(temp) = self.temp else {
            log::debug!("Keeping local checkout at {}", self.path.display());
            return;
        };

        status.report(StatusUpdate::new(Stage::Cleanup, "🧹 Removing temporary files..."));
        let path = temp.path().to_path_buf();
        match temp.close() {
            Ok(()) => log::info!("Removed temporary checkout {}", path.display()),
            Err(e) => {
                log::warn!("Failed to remove temporary checkout {}: {e}", path.display());
                status.report(StatusUpdate::warning(
                    Stage::Cleanup,
                    format!("⚠ Could not remove {}: {e}", path.display()),
                ));
            }
        }
    }
}

/// Whether `dir` holds a checkout the builder can use
pub fn is_checkout(dir: &Path, config: &InstallerConfig) -> bool {
    dir.join(&config.source_marker).is_file()
}

/// Find a local checkout among `candidates`, in order
pub fn find_local_checkout(candidates: &[PathBuf], config: &InstallerConfig) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|dir| is_checkout(dir, config))
        .cloned()
}

/// Resolve a working copy: reuse the first local checkout in `candidates`,
/// or clone a fresh one. A clone is never attempted when a checkout exists.
pub fn acquire(
    profile: &HostProfile,
    candidates: &[PathBuf],
    env: &dyn HostEnvironment,
    runner: &dyn ExternalCommand,
    config: &InstallerConfig,
    status: &dyn StatusSink,
) -> Result<SourceLocation> {
    if let Some(dir) = find_local_checkout(candidates, config) {
        log::info!("Using local repository at {}", dir.display());
        status.report(StatusUpdate::success(
            Stage::Acquire,
            format!("📂 Using local repository {}", dir.display()),
        ));
        return Ok(SourceLocation::local(dir));
    }

    status.report(StatusUpdate::new(
        Stage::Acquire,
        "📥 Downloading repository...",
    ));
    let source = clone_fresh(env, runner, config)?;
    log::info!(
        "Cloned {} into {} for {}",
        config.repo_url,
        source.path().display(),
        profile.platform()
    );
    status.report(StatusUpdate::success(Stage::Acquire, "✅ Repository downloaded"));
    Ok(source)
}

/// Shallow-clone the upstream repository into a new temporary directory
fn clone_fresh(
    env: &dyn HostEnvironment,
    runner: &dyn ExternalCommand,
    config: &InstallerConfig,
) -> Result<SourceLocation> {
    let temp = tempfile::Builder::new()
        .prefix("defacto-src-")
        .tempdir_in(env.temp_root())
        .map_err(|e| InstallerError::Acquisition(format!("failed to create temp directory: {e}")))?;

    let spec = CommandSpec::new("git")
        .args(["clone", "--depth", "1"])
        .arg(config.repo_url.as_str())
        .arg(temp.path().display().to_string());

    // On any error below `temp` drops and the directory goes with it
    let output = runner
        .run(&spec)
        .map_err(|e| InstallerError::Acquisition(format!("failed to run git: {e}")))?;
    if !output.success() {
        return Err(InstallerError::Acquisition(format!(
            "`{spec}` exited with {}: {}",
            exit_label(output.code),
            output.diagnostic()
        )));
    }

    if !is_checkout(temp.path(), config) {
        return Err(InstallerError::Acquisition(format!(
            "cloned repository has no {}",
            config.source_marker.display()
        )));
    }

    Ok(SourceLocation {
        path: temp.path().to_path_buf(),
        origin: SourceOrigin::FreshlyCloned,
        temp: Some(temp),
    })
}

pub(crate) fn exit_label(code: Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| format!("code {c}"))
}
