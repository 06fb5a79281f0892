//! Top-level runners for the console binaries

use std::io::Write;

use anyhow::Result;
use termcolor::Color;

use crate::cli::{PackageArgs, QuickInstallArgs};
use crate::command::SystemCommand;
use crate::config::InstallerConfig;
use crate::console::{ConsoleSink, line, stdout};
use crate::detection::{self, Variant};
use crate::environment::SystemEnvironment;
use crate::orchestration::Pipeline;
use crate::package;
use crate::wizard;

/// Run the console one-shot installer
pub fn run_quick_install(args: &QuickInstallArgs) -> Result<()> {
    let config = InstallerConfig::default();
    let env = SystemEnvironment;
    let platform = detection::detect_platform(&env).ok();

    wizard::show_welcome(&config, "Quick Install", platform);
    if !wizard::confirm_install(args.yes)? {
        let mut out = stdout();
        line(&mut out, Some(Color::Yellow), false, "Installation cancelled.");
        return Ok(());
    }

    let runner = SystemCommand;
    let sink = ConsoleSink::new();
    let result = Pipeline::new(&env, &runner, &sink, &config)
        .run(Variant::QuickInstall, args.source.clone());
    sink.finish();

    match result {
        Ok(report) => {
            if let Some(platform) = platform {
                wizard::show_completion(&config, platform, &report);
            }
            Ok(())
        }
        Err(err) => {
            wizard::show_failure(&err, platform);
            Err(err.into())
        }
    }
}

/// Build the Windows installer package
pub fn run_package(args: &PackageArgs) -> Result<()> {
    let mut config = InstallerConfig::load(args.config.as_deref())?;
    if let Some(version) = &args.release_version {
        config.version = version.clone();
    }

    let env = SystemEnvironment;
    let platform = detection::detect_platform(&env).ok();
    wizard::show_welcome(
        &config,
        &format!("Windows Installer Builder v{}", config.version),
        platform,
    );

    let runner = SystemCommand;
    let sink = ConsoleSink::new();
    let result = package::run(&args.repo, &args.output, &env, &runner, &config, &sink);
    sink.finish();

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            wizard::show_failure(&err, platform);
            return Err(err.into());
        }
    };

    let mut out = stdout();
    match &report.installer {
        Some(installer) => {
            line(&mut out, Some(Color::Green), true, "\n✅ Installer ready");
            let _ = writeln!(out, "   {}", installer.display());
        }
        None => {
            line(&mut out, Some(Color::Yellow), true, "\nTo create the installer:");
            for (i, step) in report.instructions.iter().enumerate() {
                let _ = writeln!(out, "  {}. {step}", i + 1);
            }
        }
    }
    let _ = writeln!(out, "\nFiles: {}", report.staging_dir.display());
    Ok(())
}
