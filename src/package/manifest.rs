//! Fixed file manifest for the Windows installer and its staging directory

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InstallerError, Result};

/// One file bundled into the installer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFile {
    pub source: PathBuf,
    /// File name inside the staging directory
    pub staged_name: String,
    /// Subdirectory of the install directory, `None` for the root
    pub install_subdir: Option<&'static str>,
}

/// Compiler executable, the hello-world example and the README
pub fn manifest(repo: &Path, artifact: &Path) -> Vec<PackageFile> {
    let artifact_name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "defacto.exe".to_string());

    vec![
        PackageFile {
            source: artifact.to_path_buf(),
            staged_name: artifact_name,
            install_subdir: None,
        },
        PackageFile {
            source: repo.join("hello.de"),
            staged_name: "hello.de".to_string(),
            install_subdir: Some("examples"),
        },
        PackageFile {
            source: repo.join("README.md"),
            staged_name: "README.txt".to_string(),
            install_subdir: Some("docs"),
        },
    ]
}

/// Copy every manifest entry into `staging_dir`, creating it if needed
pub fn stage(files: &[PackageFile], staging_dir: &Path) -> Result<()> {
    fs::create_dir_all(staging_dir).map_err(|e| {
        InstallerError::Package(format!("failed to create {}: {e}", staging_dir.display()))
    })?;

    for file in files {
        let dest = staging_dir.join(&file.staged_name);
        fs::copy(&file.source, &dest).map_err(|e| {
            InstallerError::Package(format!(
                "failed to copy {} to {}: {e}",
                file.source.display(),
                dest.display()
            ))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_renamed_readme() {
        let repo = tempfile::tempdir().unwrap();
        fs::create_dir_all(repo.path().join("compiler")).unwrap();
        fs::write(repo.path().join("compiler/defacto.exe"), b"MZ").unwrap();
        fs::write(repo.path().join("hello.de"), "main {}").unwrap();
        fs::write(repo.path().join("README.md"), "# Defacto").unwrap();

        let files = manifest(repo.path(), &repo.path().join("compiler/defacto.exe"));
        let staging = repo.path().join("installer_pkg");
        stage(&files, &staging).unwrap();
        // Staging twice over an existing directory is fine
        stage(&files, &staging).unwrap();

        assert_eq!(fs::read(staging.join("defacto.exe")).unwrap(), b"MZ");
        assert_eq!(fs::read_to_string(staging.join("README.txt")).unwrap(), "# Defacto");
        assert!(staging.join("hello.de").is_file());
        assert_eq!(files[1].install_subdir, Some("examples"));
    }

    #[test]
    fn missing_example_is_a_package_error() {
        let repo = tempfile::tempdir().unwrap();
        fs::write(repo.path().join("defacto.exe"), b"MZ").unwrap();

        let files = manifest(repo.path(), &repo.path().join("defacto.exe"));
        let err = stage(&files, &repo.path().join("out")).unwrap_err();
        assert!(matches!(err, InstallerError::Package(msg) if msg.contains("hello.de")));
    }
}
