//! Host environment capability
//!
//! Everything the installer reads from the running system (OS identifier,
//! tool resolution, environment variables, the persisted search path) goes
//! through [`HostEnvironment`] so tests can substitute a fake host.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::command::{CommandSpec, ExternalCommand};
use crate::source::exit_label;

const SETX_LIMIT: usize = 1024;

/// Operating systems the installer knows how to target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Map an OS identifier (as in `std::env::consts::OS`) to a platform
    pub fn from_os_id(id: &str) -> Option<Self> {
        match id {
            "windows" => Some(Self::Windows),
            "macos" => Some(Self::MacOs),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }

    pub fn is_windows(self) -> bool {
        self == Self::Windows
    }

    /// Separator used when joining search-path entries
    pub fn path_separator(self) -> char {
        if self.is_windows() { ';' } else { ':' }
    }

    /// Package manager command prefix shown in remediation text
    pub fn package_manager_hint(self) -> &'static str {
        match self {
            Self::Windows => "choco install",
            Self::MacOs => "brew install",
            Self::Linux => "sudo apt install",
        }
    }

    /// Command line that installs `tools` with the platform package manager
    pub fn remediation<S: AsRef<str>>(self, tools: &[S]) -> String {
        let names: Vec<&str> = tools.iter().map(AsRef::as_ref).collect();
        format!("{} {}", self.package_manager_hint(), names.join(" "))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
        })
    }
}

/// Read/write access to the host the installer runs on
pub trait HostEnvironment: Send + Sync {
    /// Raw OS identifier, e.g. `"linux"`
    fn os_id(&self) -> String;

    /// Resolve an executable by name on the search path
    fn resolve_tool(&self, name: &str) -> Option<PathBuf>;

    fn var(&self, key: &str) -> Option<String>;

    /// Conventional system binary directory on POSIX hosts
    fn system_bin_dir(&self) -> PathBuf;

    /// Parent directory for ephemeral checkouts
    fn temp_root(&self) -> PathBuf;

    /// Directories searched for an existing checkout when no hint is given
    fn invocation_dirs(&self) -> Vec<PathBuf>;

    /// Current user-level search-path value
    fn user_path(&self) -> Option<String>;

    /// Persist `value` as the user search path. `added` is the entry that was
    /// appended, for hosts that persist by appending a line rather than
    /// replacing the whole value. Tools are spawned through `runner`.
    ///
    /// Returns `false` when the persisted state already held the entry and
    /// nothing was written.
    fn persist_user_path(
        &self,
        value: &str,
        added: &Path,
        runner: &dyn ExternalCommand,
    ) -> io::Result<bool>;
}

/// The real host
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

/// Line appended to the login profile on POSIX hosts
pub fn profile_export_line(dir: &Path) -> String {
    format!("export PATH=\"$PATH:{}\"", dir.display())
}

impl HostEnvironment for SystemEnvironment {
    fn os_id(&self) -> String {
        std::env::consts::OS.to_string()
    }

    fn resolve_tool(&self, name: &str) -> Option<PathBuf> {
        match which::which(name) {
            Ok(path) => {
                log::debug!("Resolved {name} at {}", path.display());
                Some(path)
            }
            Err(e) => {
                log::debug!("{name} not found in PATH: {e}");
                None
            }
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn system_bin_dir(&self) -> PathBuf {
        PathBuf::from("/usr/local/bin")
    }

    fn temp_root(&self) -> PathBuf {
        std::env::temp_dir()
    }

    fn invocation_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            dirs.push(exe_dir);
        }
        if let Ok(cwd) = std::env::current_dir()
            && !dirs.contains(&cwd)
        {
            dirs.push(cwd);
        }
        dirs
    }

    fn user_path(&self) -> Option<String> {
        std::env::var("PATH").ok()
    }

    #[cfg(windows)]
    fn persist_user_path(
        &self,
        value: &str,
        _added: &Path,
        runner: &dyn ExternalCommand,
    ) -> io::Result<bool> {
        setx_user_path(runner, value)?;
        Ok(true)
    }

    #[cfg(not(windows))]
    fn persist_user_path(
        &self,
        _value: &str,
        added: &Path,
        _runner: &dyn ExternalCommand,
    ) -> io::Result<bool> {
        let home = dirs::home_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "home directory not found"))?;
        append_profile_line(&home.join(".profile"), &profile_export_line(added))
    }
}

/// Write `value` as the per-user `PATH` with `setx`
pub fn setx_user_path(runner: &dyn ExternalCommand, value: &str) -> io::Result<()> {
    // setx silently truncates values past 1024 characters
    if value.len() > SETX_LIMIT {
        log::warn!(
            "PATH value is {} characters; setx truncates at {SETX_LIMIT}",
            value.len()
        );
    }

    let spec = CommandSpec::new("setx").args(["PATH", value]);
    let output = runner.run(&spec)?;
    if !output.success() {
        return Err(io::Error::other(format!(
            "setx exited with {}: {}",
            exit_label(output.code),
            output.diagnostic()
        )));
    }
    Ok(())
}

/// Append `line` to a shell profile unless it is already present. Returns
/// whether the file was changed.
pub fn append_profile_line(profile: &Path, line: &str) -> io::Result<bool> {
    let existing = match fs::read_to_string(profile) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };
    if existing.lines().any(|l| l.trim() == line) {
        return Ok(false);
    }

    let mut file = OpenOptions::new().create(true).append(true).open(profile)?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "{line}")?;
    log::info!("Added search path entry to {}", profile.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandOutput;
    use std::sync::Mutex;

    #[test]
    fn platform_from_os_id() {
        assert_eq!(Platform::from_os_id("windows"), Some(Platform::Windows));
        assert_eq!(Platform::from_os_id("macos"), Some(Platform::MacOs));
        assert_eq!(Platform::from_os_id("linux"), Some(Platform::Linux));
        assert_eq!(Platform::from_os_id("freebsd"), None);
    }

    #[test]
    fn separators_and_hints() {
        assert_eq!(Platform::Windows.path_separator(), ';');
        assert_eq!(Platform::Linux.path_separator(), ':');
        assert_eq!(Platform::MacOs.package_manager_hint(), "brew install");
        assert_eq!(Platform::Linux.package_manager_hint(), "sudo apt install");
        assert_eq!(Platform::Windows.package_manager_hint(), "choco install");
    }

    #[test]
    fn remediation_joins_tools() {
        assert_eq!(
            Platform::Linux.remediation(&["make".to_string(), "nasm".to_string()]),
            "sudo apt install make nasm"
        );
        assert_eq!(Platform::MacOs.remediation(&["g++"]), "brew install g++");
    }

    #[test]
    fn profile_line_is_appended_once() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join(".profile");
        fs::write(&profile, "alias ll='ls -l'").unwrap();
        let line = profile_export_line(Path::new("/usr/local/bin"));

        assert!(append_profile_line(&profile, &line).unwrap());
        assert!(!append_profile_line(&profile, &line).unwrap());

        let content = fs::read_to_string(&profile).unwrap();
        assert_eq!(content.matches(&line).count(), 1);
        assert!(content.starts_with("alias ll='ls -l'\n"));
        assert_eq!(line, "export PATH=\"$PATH:/usr/local/bin\"");
    }

    #[test]
    fn profile_is_created_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join(".profile");

        assert!(append_profile_line(&profile, "export PATH=\"$PATH:/opt/bin\"").unwrap());
        assert_eq!(
            fs::read_to_string(&profile).unwrap(),
            "export PATH=\"$PATH:/opt/bin\"\n"
        );
    }

    struct FakeSetx {
        code: i32,
        calls: Mutex<Vec<CommandSpec>>,
    }

    impl ExternalCommand for FakeSetx {
        fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
            self.calls.lock().unwrap().push(spec.clone());
            Ok(CommandOutput {
                code: Some(self.code),
                stdout: String::new(),
                stderr: if self.code == 0 {
                    String::new()
                } else {
                    "ERROR: Access is denied.".into()
                },
            })
        }
    }

    #[test]
    fn setx_runs_through_the_command_runner() {
        let runner = FakeSetx { code: 0, calls: Mutex::new(Vec::new()) };
        setx_user_path(&runner, r"C:\Windows;C:\Program Files\Defacto").unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "setx");
        assert_eq!(calls[0].args, ["PATH", r"C:\Windows;C:\Program Files\Defacto"]);
    }

    #[test]
    fn setx_failure_carries_diagnostic() {
        let runner = FakeSetx { code: 1, calls: Mutex::new(Vec::new()) };
        let err = setx_user_path(&runner, r"C:\Windows").unwrap_err();
        assert!(err.to_string().contains("code 1"));
        assert!(err.to_string().contains("Access is denied"));
    }
}
