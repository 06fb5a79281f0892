//! Banners, confirmation prompt and summaries for the console installer

use std::io::{IsTerminal, Write};

use anyhow::Result;
use inquire::Confirm;
use termcolor::Color;

use crate::config::InstallerConfig;
use crate::console::{line, stderr, stdout};
use crate::environment::Platform;
use crate::error::InstallerError;
use crate::install::InstallReport;

const RULE: &str = "==================================================";

/// Display welcome banner
pub fn show_welcome(config: &InstallerConfig, title: &str, platform: Option<Platform>) {
    let mut out = stdout();
    line(&mut out, Some(Color::Cyan), false, &format!("\n{RULE}"));
    line(
        &mut out,
        Some(Color::Cyan),
        true,
        &format!("{} - {title}", config.product_name),
    );
    line(&mut out, Some(Color::Cyan), false, &format!("{RULE}\n"));

    match platform {
        Some(p) => {
            let _ = writeln!(out, "🖥️  Detected: {p}\n");
        }
        None => {
            let _ = writeln!(out, "🖥️  Detected: {}\n", std::env::consts::OS);
        }
    }
}

/// Ask before touching the system. Skipped when stdin is not a terminal, so
/// piped or unattended runs proceed without input.
pub fn confirm_install(assume_yes: bool) -> Result<bool> {
    if assume_yes || !std::io::stdin().is_terminal() {
        return Ok(true);
    }

    Confirm::new("Download, build and install the Defacto compiler?")
        .with_default(true)
        .with_help_message("Requires write access to the install directory")
        .prompt()
        .map_err(|e| anyhow::anyhow!("Prompt cancelled: {}", e))
}

/// Command that installs the assembler on `platform`
pub fn assembler_hint(platform: Platform) -> String {
    platform.remediation(&["nasm"])
}

/// Display installation completion summary
pub fn show_completion(config: &InstallerConfig, platform: Platform, report: &InstallReport) {
    let mut out = stdout();
    line(&mut out, Some(Color::Green), false, RULE);
    line(&mut out, Some(Color::Green), true, "✅ Installation Complete!");
    line(&mut out, Some(Color::Green), false, RULE);

    let _ = writeln!(out, "\nInstalled: {}", report.binary.display());
    if report.path_changed {
        line(
            &mut out,
            Some(Color::Yellow),
            false,
            &format!(
                "{} was added to PATH; open a new terminal to use it",
                report.target.directory.display()
            ),
        );
    }
    if let Some(uninstaller) = &report.uninstaller {
        let _ = writeln!(out, "Uninstaller: {}", uninstaller.display());
    }

    let bin = &config.binary_name;
    let _ = writeln!(out, "\nUsage:");
    let _ = writeln!(out, "  {bin} -h                    # Help");
    let _ = writeln!(out, "  {bin} -terminal hello.de    # Compile");
    let _ = writeln!(out, "  {bin} -kernel -o out.bin os.de");

    let _ = writeln!(out, "\nDon't forget NASM:");
    let _ = writeln!(out, "  {}", assembler_hint(platform));
    let _ = writeln!(out, "  {}\n", config.assembler_url);
}

/// Print a failure diagnostic, with install commands for missing tools
pub fn show_failure(err: &InstallerError, platform: Option<Platform>) {
    let mut err_out = stderr();
    line(&mut err_out, Some(Color::Red), true, &format!("\n❌ {}", err.title()));
    line(&mut err_out, Some(Color::Red), false, &format!("   {err}"));

    if let (InstallerError::MissingDependency(missing), Some(p)) = (err, platform) {
        let _ = writeln!(err_out, "\nInstall with:");
        let _ = writeln!(err_out, "  {}", p.remediation(missing.as_slice()));
    }
}
