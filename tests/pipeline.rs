//! End-to-end pipeline runs against a fake host and fake external tools

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use defacto_install::command::{CommandOutput, CommandSpec, ExternalCommand};
use defacto_install::environment::HostEnvironment;
use defacto_install::progress::{Stage, StatusKind, StatusSink, StatusUpdate};
use defacto_install::{InstallerConfig, InstallerError, Pipeline, Variant};

struct FakeHost {
    os: &'static str,
    root: PathBuf,
    tools: Vec<&'static str>,
    bin_dir: PathBuf,
    invocation: Vec<PathBuf>,
    path: Mutex<String>,
    persisted: Mutex<Vec<String>>,
}

impl FakeHost {
    fn linux(root: &Path) -> Self {
        Self::new("linux", root, vec!["g++", "make", "nasm"])
    }

    fn windows(root: &Path) -> Self {
        Self::new("windows", root, vec!["g++", "make"])
    }

    fn new(os: &'static str, root: &Path, tools: Vec<&'static str>) -> Self {
        fs::create_dir_all(root.join("tmp")).unwrap();
        Self {
            os,
            root: root.to_path_buf(),
            tools,
            bin_dir: root.join("usr/local/bin"),
            invocation: Vec::new(),
            path: Mutex::new("/usr/bin:/bin".to_string()),
            persisted: Mutex::new(Vec::new()),
        }
    }

    fn temp_entries(&self) -> usize {
        fs::read_dir(self.root.join("tmp")).unwrap().count()
    }
}

impl HostEnvironment for FakeHost {
    fn os_id(&self) -> String {
        self.os.to_string()
    }

    fn resolve_tool(&self, name: &str) -> Option<PathBuf> {
        self.tools
            .contains(&name)
            .then(|| PathBuf::from("/usr/bin").join(name))
    }

    fn var(&self, key: &str) -> Option<String> {
        match key {
            "ProgramFiles" => Some(self.root.join("Program Files").display().to_string()),
            "APPDATA" => Some(self.root.join("AppData").display().to_string()),
            _ => None,
        }
    }

    fn system_bin_dir(&self) -> PathBuf {
        self.bin_dir.clone()
    }

    fn temp_root(&self) -> PathBuf {
        self.root.join("tmp")
    }

    fn invocation_dirs(&self) -> Vec<PathBuf> {
        self.invocation.clone()
    }

    fn user_path(&self) -> Option<String> {
        Some(self.path.lock().unwrap().clone())
    }

    fn persist_user_path(
        &self,
        value: &str,
        _added: &Path,
        _runner: &dyn ExternalCommand,
    ) -> io::Result<bool> {
        *self.path.lock().unwrap() = value.to_string();
        self.persisted.lock().unwrap().push(value.to_string());
        Ok(true)
    }
}

/// Plays git, make and powershell. A clone writes the source marker; a
/// build writes the executable unless `produce_artifact` is off.
struct FakeTools {
    produce_artifact: bool,
    calls: Mutex<Vec<CommandSpec>>,
}

impl FakeTools {
    fn new() -> Self {
        Self {
            produce_artifact: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn programs(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn clone_dest(&self) -> Option<PathBuf> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.program == "git")
            .and_then(|c| c.args.last().map(PathBuf::from))
    }
}

impl ExternalCommand for FakeTools {
    fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        self.calls.lock().unwrap().push(spec.clone());

        match spec.program.as_str() {
            "git" => {
                let dest = PathBuf::from(spec.args.last().cloned().unwrap_or_default());
                write_sources(&dest);
            }
            "make" if spec.args != ["clean"] && self.produce_artifact => {
                let name = if spec.args == ["windows"] { "defacto.exe" } else { "defacto" };
                let cwd = spec.cwd.clone().unwrap_or_default();
                fs::write(cwd.join(name), b"\x7fELF")?;
            }
            _ => {}
        }

        Ok(CommandOutput {
            code: Some(0),
            ..CommandOutput::default()
        })
    }
}

#[derive(Default)]
struct RecordingSink {
    updates: Mutex<Vec<StatusUpdate>>,
}

impl RecordingSink {
    fn last(&self) -> StatusUpdate {
        self.updates.lock().unwrap().last().cloned().unwrap()
    }
}

impl StatusSink for RecordingSink {
    fn report(&self, update: StatusUpdate) {
        self.updates.lock().unwrap().push(update);
    }
}

fn write_sources(dir: &Path) {
    fs::create_dir_all(dir.join("compiler")).unwrap();
    fs::write(dir.join("compiler/main.cpp"), "int main() {}").unwrap();
}

#[test]
fn fresh_linux_host_clones_builds_and_installs() {
    let root = tempfile::tempdir().unwrap();
    let host = FakeHost::linux(root.path());
    let tools = FakeTools::new();
    let sink = RecordingSink::default();
    let config = InstallerConfig::default();

    let report = Pipeline::new(&host, &tools, &sink, &config)
        .run(Variant::QuickInstall, None)
        .unwrap();

    let bin_dir = root.path().join("usr/local/bin");
    assert_eq!(report.binary, bin_dir.join("defacto"));
    assert!(report.binary.is_file());
    assert!(report.path_changed);
    assert_eq!(
        *host.path.lock().unwrap(),
        format!("/usr/bin:/bin:{}", bin_dir.display())
    );

    let calls = tools.programs();
    assert!(calls[0].starts_with("git clone --depth 1 https://github.com/vivooifo-droid/Defacto.git"));
    assert_eq!(&calls[1..], ["make clean", "make"]);

    // Ephemeral checkout is gone
    assert!(!tools.clone_dest().unwrap().exists());
    assert_eq!(host.temp_entries(), 0);

    let last = sink.last();
    assert_eq!(last.stage, Stage::Done);
    assert_eq!(last.kind, StatusKind::Success);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&report.binary).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0);
    }
}

#[test]
fn missing_build_driver_halts_before_clone() {
    let root = tempfile::tempdir().unwrap();
    let host = FakeHost::new("linux", root.path(), vec!["g++", "nasm"]);
    let tools = FakeTools::new();
    let sink = RecordingSink::default();
    let config = InstallerConfig::default();

    let err = Pipeline::new(&host, &tools, &sink, &config)
        .run(Variant::QuickInstall, None)
        .unwrap_err();

    assert_eq!(err, InstallerError::MissingDependency(vec!["make".to_string()]));
    assert!(tools.programs().is_empty());
    assert!(sink.last().is_error());
    assert_eq!(sink.last().stage, Stage::Probe);
}

#[test]
fn every_missing_tool_is_reported_at_once() {
    let root = tempfile::tempdir().unwrap();
    let host = FakeHost::new("linux", root.path(), vec!["g++"]);
    let tools = FakeTools::new();
    let config = InstallerConfig::default();

    let err = Pipeline::new(&host, &tools, &RecordingSink::default(), &config)
        .run(Variant::QuickInstall, None)
        .unwrap_err();
    assert_eq!(
        err,
        InstallerError::MissingDependency(vec!["make".to_string(), "nasm".to_string()])
    );
}

#[test]
fn windows_local_checkout_is_reused() {
    let root = tempfile::tempdir().unwrap();
    let checkout = root.path().join("Defacto");
    write_sources(&checkout);

    let mut host = FakeHost::windows(root.path());
    host.invocation = vec![root.path().join("elsewhere"), checkout.clone()];
    *host.path.lock().unwrap() = r"C:\Windows".to_string();
    let tools = FakeTools::new();
    let config = InstallerConfig::default();

    let report = Pipeline::new(&host, &tools, &RecordingSink::default(), &config)
        .run(Variant::WindowsGui, None)
        .unwrap();

    let install = root.path().join("Program Files").join("Defacto");
    assert_eq!(report.binary, install.join("defacto.exe"));
    assert!(report.path_changed);
    assert!(report.uninstaller.is_some());
    assert_eq!(report.shortcuts.len(), 2);

    let calls = tools.programs();
    assert!(calls.iter().all(|c| !c.starts_with("git")));
    assert_eq!(&calls[..2], ["make clean", "make windows"]);

    // The local checkout is never deleted
    assert!(checkout.join("compiler/main.cpp").is_file());
    assert!(checkout.join("compiler/defacto.exe").is_file());
}

#[test]
fn windows_path_already_containing_install_dir_is_left_alone() {
    let root = tempfile::tempdir().unwrap();
    let checkout = root.path().join("Defacto");
    write_sources(&checkout);

    let install = root.path().join("Program Files").join("Defacto");
    let host = FakeHost::windows(root.path());
    *host.path.lock().unwrap() = format!(r"C:\Windows;{}", install.display());
    let tools = FakeTools::new();
    let config = InstallerConfig::default();

    let report = Pipeline::new(&host, &tools, &RecordingSink::default(), &config)
        .run(Variant::QuickInstall, Some(checkout))
        .unwrap();

    assert!(!report.path_changed);
    assert!(report.target.path_registered);
    assert!(host.persisted.lock().unwrap().is_empty());
}

#[test]
fn missing_artifact_fails_build_and_removes_clone() {
    let root = tempfile::tempdir().unwrap();
    let host = FakeHost::linux(root.path());
    let tools = FakeTools {
        produce_artifact: false,
        ..FakeTools::new()
    };
    let sink = RecordingSink::default();
    let config = InstallerConfig::default();

    let err = Pipeline::new(&host, &tools, &sink, &config)
        .run(Variant::QuickInstall, None)
        .unwrap_err();

    assert!(matches!(err, InstallerError::Build(_)));
    assert_eq!(sink.last().stage, Stage::Build);
    assert!(!root.path().join("usr/local/bin/defacto").exists());
    assert!(!tools.clone_dest().unwrap().exists());
    assert_eq!(host.temp_entries(), 0);
}

#[test]
fn deploy_failure_still_removes_clone() {
    let root = tempfile::tempdir().unwrap();
    let blocker = root.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let mut host = FakeHost::linux(root.path());
    host.bin_dir = blocker.join("bin");
    let tools = FakeTools::new();
    let config = InstallerConfig::default();

    let err = Pipeline::new(&host, &tools, &RecordingSink::default(), &config)
        .run(Variant::QuickInstall, None)
        .unwrap_err();

    assert!(matches!(err, InstallerError::Install(_)));
    assert!(!tools.clone_dest().unwrap().exists());
    assert_eq!(host.temp_entries(), 0);
}

#[test]
fn second_run_changes_nothing_but_the_binary() {
    let root = tempfile::tempdir().unwrap();
    let host = FakeHost::linux(root.path());
    let tools = FakeTools::new();
    let sink = RecordingSink::default();
    let config = InstallerConfig::default();
    let pipeline = Pipeline::new(&host, &tools, &sink, &config);

    let first = pipeline.run(Variant::QuickInstall, None).unwrap();
    let second = pipeline.run(Variant::QuickInstall, None).unwrap();

    assert_eq!(first.binary, second.binary);
    assert!(first.path_changed);
    assert!(!second.path_changed);
    assert_eq!(host.persisted.lock().unwrap().len(), 1);
}

#[test]
fn unknown_os_is_unsupported() {
    let root = tempfile::tempdir().unwrap();
    let host = FakeHost::new("plan9", root.path(), vec!["g++", "make", "nasm"]);
    let config = InstallerConfig::default();

    let err = Pipeline::new(&host, &FakeTools::new(), &RecordingSink::default(), &config)
        .run(Variant::QuickInstall, None)
        .unwrap_err();
    assert_eq!(err, InstallerError::UnsupportedPlatform("plan9".to_string()));
}
