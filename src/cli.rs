//! Command-line arguments for the installer binaries

use clap::Parser;
use std::path::PathBuf;

/// Arguments for `defacto-quick-install`
#[derive(Parser, Debug, Clone)]
#[command(name = "defacto-quick-install")]
#[command(version, about = "Download, build and install the Defacto compiler")]
pub struct QuickInstallArgs {
    /// Existing Defacto checkout to build instead of cloning
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Log stage details to stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Arguments for `defacto-installer`
#[derive(Parser, Debug, Clone)]
#[command(name = "defacto-installer")]
#[command(version, about = "Graphical installer for the Defacto compiler")]
pub struct GuiArgs {
    /// Existing Defacto checkout to build instead of cloning
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,
}

/// Arguments for `defacto-package`
#[derive(Parser, Debug, Clone)]
#[command(name = "defacto-package")]
#[command(version, about = "Build the Defacto Windows installer with NSIS")]
pub struct PackageArgs {
    /// Repository root containing compiler/, hello.de and README.md
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Staging directory for installer files and the NSIS script
    #[arg(long, default_value = "installer_pkg")]
    pub output: PathBuf,

    /// Version string embedded in the installer
    #[arg(long, value_name = "VERSION")]
    pub release_version: Option<String>,

    /// TOML file overriding product metadata
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Log stage details to stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Default log filter for the `--verbose` flag; `RUST_LOG` still wins
pub fn log_level(verbose: bool) -> log::LevelFilter {
    if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arg_definitions_are_valid() {
        QuickInstallArgs::command().debug_assert();
        GuiArgs::command().debug_assert();
        PackageArgs::command().debug_assert();
    }

    #[test]
    fn quick_install_flags() {
        let args =
            QuickInstallArgs::parse_from(["defacto-quick-install", "--source", "/src/Defacto", "-y"]);
        assert_eq!(args.source, Some(PathBuf::from("/src/Defacto")));
        assert!(args.yes);
        assert!(!args.verbose);
    }

    #[test]
    fn package_defaults() {
        let args = PackageArgs::parse_from(["defacto-package"]);
        assert_eq!(args.repo, PathBuf::from("."));
        assert_eq!(args.output, PathBuf::from("installer_pkg"));
        assert_eq!(args.release_version, None);
        assert_eq!(log_level(args.verbose), log::LevelFilter::Warn);
    }
}
