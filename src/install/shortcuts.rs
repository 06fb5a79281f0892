//! Start-menu shortcuts and uninstaller for the Windows GUI installer

use std::fs;
use std::path::{Path, PathBuf};

use crate::command::{CommandSpec, ExternalCommand};
use crate::config::VENDOR_DIR;
use crate::environment::HostEnvironment;
use crate::error::{InstallerError, Result};
use crate::source::exit_label;

pub const UNINSTALLER_NAME: &str = "uninstall.cmd";

/// Files created in the start menu and install directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutSet {
    pub shortcuts: Vec<PathBuf>,
    pub uninstaller: PathBuf,
}

/// `%APPDATA%\Microsoft\Windows\Start Menu\Programs\Defacto`
pub fn start_menu_group(env: &dyn HostEnvironment) -> Result<PathBuf> {
    let appdata = env
        .var("APPDATA")
        .ok_or_else(|| InstallerError::Install("APPDATA is not set".to_string()))?;
    Ok(PathBuf::from(appdata)
        .join("Microsoft")
        .join("Windows")
        .join("Start Menu")
        .join("Programs")
        .join(VENDOR_DIR))
}

/// Batch script that reverses the copy and shortcut steps
pub fn uninstaller_script(install_dir: &Path, binary: &Path, group: &Path) -> String {
    [
        "@echo off".to_string(),
        "rem Removes the Defacto compiler, its shortcuts and install directory".to_string(),
        format!("del /f /q \"{}\"", binary.display()),
        format!("rmdir /s /q \"{}\"", group.display()),
        "cd /d \"%TEMP%\"".to_string(),
        // The script lives in the directory it removes
        format!("(goto) 2>nul & rmdir /s /q \"{}\"", install_dir.display()),
    ]
    .join("\r\n")
        + "\r\n"
}

fn ps_quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', "''"))
}

/// PowerShell invocation creating one `.lnk` through WScript.Shell
pub fn shortcut_command(link: &Path, target: &Path, working_dir: &Path) -> CommandSpec {
    let script = format!(
        "$s = (New-Object -ComObject WScript.Shell).CreateShortcut({}); \
         $s.TargetPath = {}; $s.WorkingDirectory = {}; $s.Save()",
        ps_quote(link),
        ps_quote(target),
        ps_quote(working_dir),
    );
    CommandSpec::new("powershell").args(["-NoProfile", "-NonInteractive", "-Command"]).arg(script)
}

/// Write the uninstaller and create the program group with its two shortcuts
pub fn create(
    install_dir: &Path,
    binary: &Path,
    env: &dyn HostEnvironment,
    runner: &dyn ExternalCommand,
) -> Result<ShortcutSet> {
    let group = start_menu_group(env)?;
    fs::create_dir_all(&group).map_err(|e| {
        InstallerError::Install(format!("failed to create {}: {e}", group.display()))
    })?;

    let uninstaller = install_dir.join(UNINSTALLER_NAME);
    fs::write(&uninstaller, uninstaller_script(install_dir, binary, &group)).map_err(|e| {
        InstallerError::Install(format!("failed to write {}: {e}", uninstaller.display()))
    })?;

    let links = [
        (group.join(format!("{VENDOR_DIR}.lnk")), binary),
        (group.join("Uninstall.lnk"), uninstaller.as_path()),
    ];
    let mut shortcuts = Vec::with_capacity(links.len());
    for (link, target) in links {
        let spec = shortcut_command(&link, target, install_dir);
        let output = runner.run(&spec).map_err(|e| {
            InstallerError::Install(format!("failed to run powershell: {e}"))
        })?;
        if !output.success() {
            return Err(InstallerError::Install(format!(
                "creating {} exited with {}: {}",
                link.display(),
                exit_label(output.code),
                output.diagnostic()
            )));
        }
        log::info!("Created shortcut {}", link.display());
        shortcuts.push(link);
    }

    Ok(ShortcutSet {
        shortcuts,
        uninstaller,
    })
}
