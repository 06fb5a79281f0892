//! User search-path registration
//!
//! Read-modify-write of the persisted path value. Append-only; the only
//! duplicate check is a substring test against the current value.

use std::path::Path;

use crate::command::ExternalCommand;
use crate::environment::{HostEnvironment, Platform};
use crate::error::{InstallerError, Result};

/// Whether `dir` already appears anywhere in `path_value`
pub fn contains_entry(path_value: &str, dir: &Path) -> bool {
    path_value.contains(dir.to_string_lossy().as_ref())
}

/// Append `dir` to `current` with the platform separator
pub fn append_entry(current: &str, dir: &Path, separator: char) -> String {
    let dir = dir.to_string_lossy();
    let trimmed = current.trim_end_matches(separator);
    if trimmed.is_empty() {
        dir.into_owned()
    } else {
        format!("{trimmed}{separator}{dir}")
    }
}

/// Add `dir` to the user search path unless it is already there.
///
/// Returns `true` when the persisted value changed; the change only shows up
/// in new shell sessions. A login profile that already carries the entry
/// counts as unchanged even when the running process's path lacks it.
pub fn register(
    dir: &Path,
    platform: Platform,
    env: &dyn HostEnvironment,
    runner: &dyn ExternalCommand,
) -> Result<bool> {
    let current = env.user_path().unwrap_or_default();
    if contains_entry(&current, dir) {
        log::info!("{} already on PATH", dir.display());
        return Ok(false);
    }

    let updated = append_entry(&current, dir, platform.path_separator());
    let changed = env.persist_user_path(&updated, dir, runner).map_err(|e| {
        InstallerError::Install(format!("failed to add {} to PATH: {e}", dir.display()))
    })?;
    if changed {
        log::info!("Added {} to PATH", dir.display());
    } else {
        log::info!("{} already persisted on PATH", dir.display());
    }
    Ok(changed)
}
