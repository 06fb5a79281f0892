//! Windows installer packaging
//!
//! Builds the Windows executable from an existing checkout, stages it with
//! the example program and README, renders the NSIS script, and compiles it
//! with makensis when available. Without makensis the staged directory and
//! script are left in place together with manual instructions.

pub mod manifest;
pub mod script;
pub mod template;
pub mod toolset;

use std::path::{Path, PathBuf};

use crate::builder::{self, BuildTarget};
use crate::command::ExternalCommand;
use crate::config::InstallerConfig;
use crate::detection::{self, Variant};
use crate::environment::{HostEnvironment, Platform};
use crate::error::{InstallerError, Result};
use crate::progress::{Stage, StatusSink, StatusUpdate};
use crate::source;

/// What a packaging run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    pub staging_dir: PathBuf,
    pub script: PathBuf,
    /// `None` when makensis is not installed
    pub installer: Option<PathBuf>,
    /// Steps to finish by hand when `installer` is `None`
    pub instructions: Vec<String>,
}

/// Package the checkout at `repo` into `staging_dir`
pub fn run(
    repo: &Path,
    staging_dir: &Path,
    env: &dyn HostEnvironment,
    runner: &dyn ExternalCommand,
    config: &InstallerConfig,
    status: &dyn StatusSink,
) -> Result<PackageReport> {
    status.report(StatusUpdate::new(Stage::Probe, "🔍 Checking dependencies..."));
    detection::probe(env, Variant::Package)?;

    if !source::is_checkout(repo, config) {
        return Err(InstallerError::Package(format!(
            "{} is not a Defacto checkout ({} missing)",
            repo.display(),
            config.source_marker.display()
        )));
    }

    let artifact = builder::build_target(
        repo,
        BuildTarget::Windows,
        Platform::Windows,
        runner,
        config,
        status,
    )?;

    status.report(StatusUpdate::new(
        Stage::Package,
        format!("📁 Staging files in {}...", staging_dir.display()),
    ));
    let files = manifest::manifest(repo, &artifact.path);
    manifest::stage(&files, staging_dir)?;

    let script = script::generate(config, &files, staging_dir)?;
    status.report(StatusUpdate::success(
        Stage::Package,
        format!("✅ Created: {}", script.display()),
    ));

    let Some(makensis) = toolset::find_makensis(env) else {
        let instructions = toolset::manual_instructions(staging_dir);
        status.report(StatusUpdate::warning(
            Stage::Package,
            "⚠ NSIS not found; compile the installer manually",
        ));
        return Ok(PackageReport {
            staging_dir: staging_dir.to_path_buf(),
            script,
            installer: None,
            instructions,
        });
    };

    status.report(StatusUpdate::new(Stage::Package, "🔨 Compiling installer..."));
    let installer = toolset::run_makensis(
        runner,
        &makensis,
        staging_dir,
        &script,
        &config.installer_name(),
    )?;
    status.report(StatusUpdate::complete(format!(
        "✅ Installer created: {}",
        installer.display()
    )));

    Ok(PackageReport {
        staging_dir: staging_dir.to_path_buf(),
        script,
        installer: Some(installer),
        instructions: Vec::new(),
    })
}
