//! Product metadata shared by every installer variant
//!
//! Defaults are the fixed values the installers ship with. The packager may
//! load a TOML file to override the release version; install locations are
//! never configurable.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Upstream repository cloned when no local checkout is found
pub const REPO_URL: &str = "https://github.com/vivooifo-droid/Defacto.git";

/// Vendor directory created under Program Files and the start menu
pub const VENDOR_DIR: &str = "Defacto";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InstallerConfig {
    pub product_name: String,
    /// Executable stem; `.exe` is appended for Windows builds
    pub binary_name: String,
    pub repo_url: String,
    /// Build directory inside a checkout
    pub compiler_dir: String,
    /// File whose presence marks a directory as a usable checkout
    pub source_marker: PathBuf,
    pub version: String,
    pub assembler_url: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            product_name: "Defacto Compiler".to_string(),
            binary_name: "defacto".to_string(),
            repo_url: REPO_URL.to_string(),
            compiler_dir: "compiler".to_string(),
            source_marker: PathBuf::from("compiler").join("main.cpp"),
            version: "0.25".to_string(),
            assembler_url: "https://www.nasm.us/".to_string(),
        }
    }
}

impl InstallerConfig {
    /// Load config from a TOML file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// File name of the built executable for a Windows or native target
    pub fn artifact_name(&self, windows: bool) -> String {
        if windows {
            format!("{}.exe", self.binary_name)
        } else {
            self.binary_name.clone()
        }
    }

    /// Installer executable produced by makensis
    pub fn installer_name(&self) -> String {
        format!("{}-{}-installer.exe", self.binary_name, self.version)
    }
}
