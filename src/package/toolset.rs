//! makensis detection and invocation

use std::path::{Path, PathBuf};

use crate::command::{CommandSpec, ExternalCommand};
use crate::environment::HostEnvironment;
use crate::error::{InstallerError, Result};
use crate::source::exit_label;

const MAKENSIS: &str = "makensis";

/// Locate makensis on PATH
pub fn find_makensis(env: &dyn HostEnvironment) -> Option<PathBuf> {
    let found = env.resolve_tool(MAKENSIS);
    match &found {
        Some(path) => log::info!("Found makensis at {}", path.display()),
        None => log::info!("makensis not found on PATH"),
    }
    found
}

/// Compile `script` inside `staging_dir` and return the installer path
pub fn run_makensis(
    runner: &dyn ExternalCommand,
    makensis: &Path,
    staging_dir: &Path,
    script: &Path,
    installer_name: &str,
) -> Result<PathBuf> {
    let script_name = script
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| script.display().to_string());

    let spec = CommandSpec::new(makensis.display().to_string())
        .arg(script_name)
        .current_dir(staging_dir);
    log::info!("Running {spec}");

    let output = runner
        .run(&spec)
        .map_err(|e| InstallerError::Package(format!("failed to run makensis: {e}")))?;
    if !output.success() {
        return Err(InstallerError::Package(format!(
            "makensis exited with {}: {}",
            exit_label(output.code),
            output.diagnostic()
        )));
    }

    let installer = staging_dir.join(installer_name);
    if !installer.is_file() {
        return Err(InstallerError::Package(format!(
            "makensis succeeded but {} was not produced",
            installer.display()
        )));
    }
    Ok(installer)
}

/// Steps shown when makensis is not installed
pub fn manual_instructions(staging_dir: &Path) -> Vec<String> {
    vec![
        "Install NSIS: https://nsis.sourceforge.io/".to_string(),
        format!("cd {}", staging_dir.display()),
        "makensis installer.nsi".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandOutput;
    use std::io;
    use std::sync::Mutex;

    struct FakeNsis {
        code: i32,
        produce: bool,
        calls: Mutex<Vec<CommandSpec>>,
    }

    impl ExternalCommand for FakeNsis {
        fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
            self.calls.lock().unwrap().push(spec.clone());
            if self.produce {
                if let Some(dir) = &spec.cwd {
                    std::fs::write(dir.join("defacto-0.25-installer.exe"), b"MZ")?;
                }
            }
            Ok(CommandOutput {
                code: Some(self.code),
                stdout: String::new(),
                stderr: if self.code == 0 { String::new() } else { "Error in script".into() },
            })
        }
    }

    #[test]
    fn compiles_in_staging_dir() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeNsis { code: 0, produce: true, calls: Mutex::new(Vec::new()) };

        let out = run_makensis(
            &runner,
            Path::new("makensis"),
            dir.path(),
            &dir.path().join("installer.nsi"),
            "defacto-0.25-installer.exe",
        )
        .unwrap();

        assert_eq!(out, dir.path().join("defacto-0.25-installer.exe"));
        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls[0].args, vec!["installer.nsi".to_string()]);
        assert_eq!(calls[0].cwd.as_deref(), Some(dir.path()));
    }

    #[test]
    fn failure_carries_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeNsis { code: 1, produce: false, calls: Mutex::new(Vec::new()) };

        let err = run_makensis(
            &runner,
            Path::new("makensis"),
            dir.path(),
            &dir.path().join("installer.nsi"),
            "defacto-0.25-installer.exe",
        )
        .unwrap_err();
        assert!(matches!(err, InstallerError::Package(msg) if msg.contains("Error in script")));
    }

    #[test]
    fn missing_output_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeNsis { code: 0, produce: false, calls: Mutex::new(Vec::new()) };

        let err = run_makensis(
            &runner,
            Path::new("makensis"),
            dir.path(),
            &dir.path().join("installer.nsi"),
            "defacto-0.25-installer.exe",
        )
        .unwrap_err();
        assert!(matches!(err, InstallerError::Package(msg) if msg.contains("not produced")));
    }
}
