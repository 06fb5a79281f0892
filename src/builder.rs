//! Native build of the compiler
//!
//! Runs `make clean` followed by the platform build target inside the
//! checkout's compiler directory, then checks that the executable really
//! exists. A zero exit code alone is never taken as success.

use std::fs;
use std::path::{Path, PathBuf};

use crate::command::{CommandSpec, ExternalCommand};
use crate::config::InstallerConfig;
use crate::detection::HostProfile;
use crate::environment::Platform;
use crate::error::{InstallerError, Result};
use crate::progress::{Stage, StatusSink, StatusUpdate};
use crate::source::{SourceLocation, exit_label};

/// Build driver target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTarget {
    /// `make` with no target: an executable for the host
    Native,
    /// `make windows`: a Windows executable, cross-compiled off Windows
    Windows,
}

impl BuildTarget {
    pub fn for_platform(platform: Platform) -> Self {
        if platform.is_windows() {
            Self::Windows
        } else {
            Self::Native
        }
    }

    fn make_args(self) -> &'static [&'static str] {
        match self {
            Self::Native => &[],
            Self::Windows => &["windows"],
        }
    }
}

/// Executable produced by a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    pub path: PathBuf,
    pub platform: Platform,
}

impl BuildArtifact {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Build for the host platform
pub fn build(
    source: &SourceLocation,
    profile: &HostProfile,
    runner: &dyn ExternalCommand,
    config: &InstallerConfig,
    status: &dyn StatusSink,
) -> Result<BuildArtifact> {
    let target = BuildTarget::for_platform(profile.platform());
    build_target(source.path(), target, profile.platform(), runner, config, status)
}

/// Build an explicit target in `checkout`. The packager uses this to
/// cross-compile the Windows executable.
pub fn build_target(
    checkout: &Path,
    target: BuildTarget,
    platform: Platform,
    runner: &dyn ExternalCommand,
    config: &InstallerConfig,
    status: &dyn StatusSink,
) -> Result<BuildArtifact> {
    let compiler_dir = checkout.join(&config.compiler_dir);
    status.report(StatusUpdate::new(Stage::Build, "📦 Building compiler..."));

    let clean = CommandSpec::new("make").arg("clean").current_dir(&compiler_dir);
    match runner.run(&clean) {
        Ok(out) if out.success() => {}
        Ok(out) => log::warn!(
            "`make clean` exited with {}, continuing: {}",
            exit_label(out.code),
            out.diagnostic()
        ),
        Err(e) => {
            return Err(InstallerError::Build(format!("failed to run make: {e}")));
        }
    }

    let spec = CommandSpec::new("make")
        .args(target.make_args().iter().copied())
        .current_dir(&compiler_dir);
    let output = runner
        .run(&spec)
        .map_err(|e| InstallerError::Build(format!("failed to run make: {e}")))?;
    if !output.success() {
        return Err(InstallerError::Build(output.diagnostic()));
    }

    let artifact = compiler_dir.join(config.artifact_name(target == BuildTarget::Windows));
    verify_artifact(&artifact)?;

    log::info!("Built {}", artifact.display());
    let built = BuildArtifact {
        path: artifact,
        platform,
    };
    status.report(StatusUpdate::success(
        Stage::Build,
        format!("✅ Built: {}", built.file_name()),
    ));
    Ok(built)
}

/// The artifact must exist and be non-empty
fn verify_artifact(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
        Ok(_) => Err(InstallerError::Build(format!(
            "build reported success but {} is empty",
            path.display()
        ))),
        Err(_) => Err(InstallerError::Build(format!(
            "build reported success but {} was not produced",
            path.display()
        ))),
    }
}
