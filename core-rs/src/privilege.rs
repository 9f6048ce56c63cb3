//! Privilege precondition for mutating commands
//!
//! Install and uninstall write under the install root, which is usually a
//! system location. The check runs before any mutation so the command fails
//! fast instead of half-way through a batch.

use std::path::Path;
use tracing::debug;

use crate::errors::{Result, RkError};

/// Ensure the current account may create and delete entries under `root`
///
/// When `root` does not exist yet, its nearest existing ancestor is checked,
/// since that is where the first directory will be created.
pub fn ensure_writable(root: &Path) -> Result<()> {
    let Some(existing) = root.ancestors().find(|p| !p.as_os_str().is_empty() && p.exists()) else {
        // relative root with nothing on disk: the working directory decides
        return check_access(Path::new("."), root);
    };
    check_access(existing, root)
}

#[cfg(unix)]
fn check_access(existing: &Path, root: &Path) -> Result<()> {
    use nix::unistd::{access, AccessFlags};

    // a plain file in the way gets replaced, so its directory is what matters
    let target = if existing.is_file() {
        existing.parent().unwrap_or(existing)
    } else {
        existing
    };

    match access(target, AccessFlags::W_OK | AccessFlags::X_OK) {
        Ok(()) => {
            debug!("Write access to {} confirmed", target.display());
            Ok(())
        }
        Err(errno) => {
            debug!("No write access to {}: {}", target.display(), errno);
            Err(RkError::PermissionDenied(root.to_path_buf()))
        }
    }
}

#[cfg(not(unix))]
fn check_access(existing: &Path, root: &Path) -> Result<()> {
    let metadata = std::fs::metadata(existing)?;
    if metadata.permissions().readonly() {
        debug!("{} is read-only", existing.display());
        return Err(RkError::PermissionDenied(root.to_path_buf()));
    }
    Ok(())
}
