//! Installation pipeline
//!
//! Probe → acquire → build → deploy, strictly in order. The first failure
//! stops the run and earlier side effects stay in place. The one guarantee
//! made on every exit path is that an ephemeral checkout is removed.

use std::path::PathBuf;

use crate::builder;
use crate::command::ExternalCommand;
use crate::config::InstallerConfig;
use crate::detection::{self, HostProfile, Variant};
use crate::environment::HostEnvironment;
use crate::error::{InstallerError, Result};
use crate::install::{self, InstallReport};
use crate::progress::{Stage, StatusSink, StatusUpdate};
use crate::source;

/// Capabilities and settings for one installer run
pub struct Pipeline<'a> {
    pub env: &'a dyn HostEnvironment,
    pub runner: &'a dyn ExternalCommand,
    pub status: &'a dyn StatusSink,
    pub config: &'a InstallerConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        env: &'a dyn HostEnvironment,
        runner: &'a dyn ExternalCommand,
        status: &'a dyn StatusSink,
        config: &'a InstallerConfig,
    ) -> Self {
        Self {
            env,
            runner,
            status,
            config,
        }
    }

    /// Run every stage for `variant`. `source_hint` is checked for a local
    /// checkout before the directories the installer was started from.
    pub fn run(&self, variant: Variant, source_hint: Option<PathBuf>) -> Result<InstallReport> {
        let result = self.run_stages(variant, source_hint);
        match &result {
            Ok(report) => self.status.report(StatusUpdate::complete(format!(
                "✅ Installation complete! {}",
                report.binary.display()
            ))),
            Err(e) => {
                log::error!("{e}");
                self.status
                    .report(StatusUpdate::error(stage_of(e), format!("❌ {e}")));
            }
        }
        result
    }

    fn run_stages(&self, variant: Variant, source_hint: Option<PathBuf>) -> Result<InstallReport> {
        self.status
            .report(StatusUpdate::new(Stage::Probe, "📋 Checking dependencies..."));
        let profile = detection::probe(self.env, variant)?;
        self.status.report(StatusUpdate::success(
            Stage::Probe,
            format!("✅ All dependencies OK ({})", profile.platform()),
        ));

        let candidates: Vec<PathBuf> = source_hint
            .into_iter()
            .chain(self.env.invocation_dirs())
            .collect();
        let checkout = source::acquire(
            &profile,
            &candidates,
            self.env,
            self.runner,
            self.config,
            self.status,
        )?;

        let outcome = self.build_and_deploy(&checkout, &profile, variant);
        checkout.release(self.status);
        outcome
    }

    fn build_and_deploy(
        &self,
        checkout: &source::SourceLocation,
        profile: &HostProfile,
        variant: Variant,
    ) -> Result<InstallReport> {
        let artifact = builder::build(checkout, profile, self.runner, self.config, self.status)?;
        install::deploy(&artifact, profile, variant, self.env, self.runner, self.status)
    }
}

/// Stage that produced an error, for status display
pub fn stage_of(err: &InstallerError) -> Stage {
    match err {
        InstallerError::MissingDependency(_) | InstallerError::UnsupportedPlatform(_) => {
            Stage::Probe
        }
        InstallerError::Acquisition(_) => Stage::Acquire,
        InstallerError::Build(_) => Stage::Build,
        InstallerError::Install(_) => Stage::Deploy,
        InstallerError::Package(_) => Stage::Package,
    }
}
