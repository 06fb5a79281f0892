//! NSIS script generation

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;

use super::manifest::PackageFile;
use super::template::NSI_TEMPLATE;
use crate::config::{InstallerConfig, VENDOR_DIR};
use crate::error::{InstallerError, Result};

pub const SCRIPT_NAME: &str = "installer.nsi";

const NSIS_UNINSTALLER: &str = "uninstall.exe";

#[derive(Debug, Serialize)]
struct ScriptFile {
    name: String,
    /// Absolute NSIS directory, absent for files in `$INSTDIR`
    target_dir: Option<String>,
    /// Path relative to `$INSTDIR`
    oname: String,
}

#[derive(Debug, Serialize)]
struct ScriptData {
    product_name: String,
    shortcut_path: String,
    version: String,
    out_file: String,
    install_dir: String,
    start_menu: String,
    binary_path: String,
    uninstaller_path: String,
    assembler_url: String,
    files: Vec<ScriptFile>,
}

fn script_data(config: &InstallerConfig, files: &[PackageFile]) -> ScriptData {
    let files = files
        .iter()
        .map(|f| match f.install_subdir {
            Some(sub) => ScriptFile {
                name: f.staged_name.clone(),
                target_dir: Some(format!("$INSTDIR\\{sub}")),
                oname: format!("{sub}\\{}", f.staged_name),
            },
            None => ScriptFile {
                name: f.staged_name.clone(),
                target_dir: None,
                oname: f.staged_name.clone(),
            },
        })
        .collect();

    ScriptData {
        product_name: config.product_name.clone(),
        shortcut_path: format!("$SMPROGRAMS\\{VENDOR_DIR}\\{VENDOR_DIR}.lnk"),
        version: config.version.clone(),
        out_file: config.installer_name(),
        install_dir: format!("$PROGRAMFILES\\{VENDOR_DIR}"),
        start_menu: format!("$SMPROGRAMS\\{VENDOR_DIR}"),
        binary_path: format!("$INSTDIR\\{}", config.artifact_name(true)),
        uninstaller_path: format!("$INSTDIR\\{NSIS_UNINSTALLER}"),
        assembler_url: config.assembler_url.clone(),
        files,
    }
}

/// Render the installer script for `files`
pub fn render(config: &InstallerConfig, files: &[PackageFile]) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string(SCRIPT_NAME, NSI_TEMPLATE)
        .map_err(|e| InstallerError::Package(format!("failed to register NSI template: {e}")))?;

    handlebars
        .render(SCRIPT_NAME, &script_data(config, files))
        .map_err(|e| InstallerError::Package(format!("failed to render NSI template: {e}")))
}

/// Render and write `installer.nsi` into `staging_dir`
pub fn generate(
    config: &InstallerConfig,
    files: &[PackageFile],
    staging_dir: &Path,
) -> Result<PathBuf> {
    let content = render(config, files)?;
    let path = staging_dir.join(SCRIPT_NAME);
    write_utf8_bom(&path, &content).map_err(|e| {
        InstallerError::Package(format!("failed to write {}: {e}", path.display()))
    })?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}

/// NSIS reads UTF-8 scripts only when they start with a byte order mark
fn write_utf8_bom(path: &Path, content: &str) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(&[0xEF, 0xBB, 0xBF])?;
    file.write_all(content.as_bytes())?;
    file.flush()
}
