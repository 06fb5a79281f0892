//! Deployment of the built compiler
//!
//! Copies the artifact into the platform install directory, makes it
//! executable, registers the directory on the user search path and, for the
//! Windows GUI installer, creates shortcuts and an uninstaller. Every step is
//! safe to repeat on an already-installed system.

pub mod path;
pub mod shortcuts;

use std::fs;
use std::path::{Path, PathBuf};

use crate::builder::BuildArtifact;
use crate::command::ExternalCommand;
use crate::config::VENDOR_DIR;
use crate::detection::{HostProfile, Variant};
use crate::environment::{HostEnvironment, Platform};
use crate::error::{InstallerError, Result};
use crate::progress::{Stage, StatusSink, StatusUpdate};

/// Where the compiler ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    pub directory: PathBuf,
    /// Directory is on the persisted user path after this run
    pub path_registered: bool,
}

/// What a successful run installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub binary: PathBuf,
    pub target: InstallTarget,
    /// The persisted path value changed; a new shell is needed to see it
    pub path_changed: bool,
    pub shortcuts: Vec<PathBuf>,
    pub uninstaller: Option<PathBuf>,
}

/// Fixed install directory: the system binary directory on POSIX, a vendor
/// directory under Program Files on Windows
pub fn install_dir(platform: Platform, env: &dyn HostEnvironment) -> Result<PathBuf> {
    if platform.is_windows() {
        let root = env
            .var("ProgramFiles")
            .ok_or_else(|| InstallerError::Install("ProgramFiles is not set".to_string()))?;
        Ok(PathBuf::from(root).join(VENDOR_DIR))
    } else {
        Ok(env.system_bin_dir())
    }
}

/// Place the artifact and update the environment
pub fn deploy(
    artifact: &BuildArtifact,
    profile: &HostProfile,
    variant: Variant,
    env: &dyn HostEnvironment,
    runner: &dyn ExternalCommand,
    status: &dyn StatusSink,
) -> Result<InstallReport> {
    let platform = profile.platform();
    let directory = install_dir(platform, env)?;
    status.report(StatusUpdate::new(
        Stage::Deploy,
        format!("📁 Installing to {}...", directory.display()),
    ));

    fs::create_dir_all(&directory).map_err(|e| {
        InstallerError::Install(format!("failed to create {}: {e}", directory.display()))
    })?;

    let file_name = artifact.path.file_name().ok_or_else(|| {
        InstallerError::Install(format!("invalid artifact path: {}", artifact.path.display()))
    })?;
    let binary = directory.join(file_name);
    fs::copy(&artifact.path, &binary).map_err(|e| {
        InstallerError::Install(format!(
            "failed to copy {} to {}: {e}",
            artifact.path.display(),
            binary.display()
        ))
    })?;

    if !platform.is_windows() {
        set_executable(&binary)?;
    }
    log::info!("Installed {}", binary.display());
    status.report(StatusUpdate::success(
        Stage::Deploy,
        format!("✅ Installed: {}", binary.display()),
    ));

    let (path_registered, path_changed) = if variant.registers_path(platform) {
        let changed = path::register(&directory, platform, env, runner)?;
        if changed {
            status.report(StatusUpdate::success(
                Stage::Deploy,
                "✅ Added to PATH (restart terminal)",
            ));
        }
        (true, changed)
    } else {
        (false, false)
    };

    let (shortcuts, uninstaller) = if variant.creates_shortcuts(platform) {
        status.report(StatusUpdate::new(Stage::Deploy, "🔗 Creating shortcuts..."));
        let set = shortcuts::create(&directory, &binary, env, runner)?;
        (set.shortcuts, Some(set.uninstaller))
    } else {
        (Vec::new(), None)
    };

    Ok(InstallReport {
        binary,
        target: InstallTarget {
            directory,
            path_registered,
        },
        path_changed,
        shortcuts,
        uninstaller,
    })
}

/// Copies do not reliably carry the executable bit, so set it explicitly
#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)
        .map_err(|e| InstallerError::Install(format!("failed to read {}: {e}", path.display())))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).map_err(|e| {
        InstallerError::Install(format!("failed to set permissions on {}: {e}", path.display()))
    })
}

#[cfg(not(unix))]
fn set_executable(path: &Path) -> Result<()> {
    log::debug!("No executable bit to set on {}", path.display());
    Ok(())
}
