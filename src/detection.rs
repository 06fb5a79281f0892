//! Host detection and dependency probing
//!
//! Determines the platform from the OS identifier and checks that every tool
//! the selected installer variant needs resolves on the search path. Tools
//! are only looked up, never version-checked, so a stale toolchain passes.

use crate::environment::{HostEnvironment, Platform};
use crate::error::{InstallerError, Result};

const CXX: &str = "g++";
const CROSS_CXX: &str = "x86_64-w64-mingw32-g++";
const MAKE: &str = "make";
const ASSEMBLER: &str = "nasm";

/// Which installer entry point is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Console one-shot install, interactive or unattended
    QuickInstall,
    /// Windows graphical installer
    WindowsGui,
    /// Developer packager producing an NSIS installer
    Package,
}

impl Variant {
    /// Tools that must resolve before anything else runs
    pub fn required_tools(self, platform: Platform) -> Vec<&'static str> {
        match self {
            Self::QuickInstall => {
                let mut tools = vec![CXX, MAKE];
                // Windows users install the assembler after the fact
                if !platform.is_windows() {
                    tools.push(ASSEMBLER);
                }
                tools
            }
            Self::WindowsGui => vec![CXX, MAKE],
            Self::Package => {
                let cxx = if platform.is_windows() { CXX } else { CROSS_CXX };
                vec![cxx, MAKE]
            }
        }
    }

    /// Whether the deployer appends the install directory to the user path.
    ///
    /// The quick installer registers on every platform; the GUI installer
    /// only on Windows.
    pub fn registers_path(self, platform: Platform) -> bool {
        match self {
            Self::QuickInstall => true,
            Self::WindowsGui => platform.is_windows(),
            Self::Package => false,
        }
    }

    /// Whether the deployer creates start-menu shortcuts and an uninstaller
    pub fn creates_shortcuts(self, platform: Platform) -> bool {
        self == Self::WindowsGui && platform.is_windows()
    }
}

/// Facts about the host, computed once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostProfile {
    platform: Platform,
    required_tools: Vec<String>,
    package_manager_hint: String,
}

impl HostProfile {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn required_tools(&self) -> &[String] {
        &self.required_tools
    }

    pub fn package_manager_hint(&self) -> &str {
        &self.package_manager_hint
    }
}

/// Detect the platform without checking tools
pub fn detect_platform(env: &dyn HostEnvironment) -> Result<Platform> {
    let os = env.os_id();
    Platform::from_os_id(&os).ok_or(InstallerError::UnsupportedPlatform(os))
}

/// Build the host profile for `variant`, failing with every missing tool
pub fn probe(env: &dyn HostEnvironment, variant: Variant) -> Result<HostProfile> {
    let platform = detect_platform(env)?;
    let required_tools: Vec<String> = variant
        .required_tools(platform)
        .into_iter()
        .map(str::to_string)
        .collect();

    let missing: Vec<String> = required_tools
        .iter()
        .filter(|tool| env.resolve_tool(tool).is_none())
        .cloned()
        .collect();

    if !missing.is_empty() {
        log::warn!("Missing dependencies on {platform}: {}", missing.join(", "));
        return Err(InstallerError::MissingDependency(missing));
    }

    log::info!(
        "Host {platform}: all {} required tools present",
        required_tools.len()
    );
    Ok(HostProfile {
        platform,
        required_tools,
        package_manager_hint: platform.package_manager_hint().to_string(),
    })
}
