//! FileSystemDriver for the kernel install root
//!
//! All filesystem mutation goes through here:
//! - Kernel directory creation with file-collision repair
//! - Icon placement (hard link, byte copy fallback)
//! - Descriptor writes
//! - Kernel directory / stray file removal
//!
//! OS errors are decoded once, into `FsFailure`, and surfaced as `RkError`.

use crate::descriptor::{KernelDescriptor, DESCRIPTOR_FILE};
use crate::errors::{Result, RkError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Mode for freshly created kernel directories
pub const KERNEL_DIR_MODE: u32 = 0o755;

/// Decoded filesystem failure
#[derive(Debug)]
pub enum FsFailure {
    /// The OS refused the operation for permission reasons
    PermissionDenied,
    /// A path component that should be a directory is a plain file
    PathCollision,
    Other(io::Error),
}

impl From<io::Error> for FsFailure {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::PermissionDenied {
            return FsFailure::PermissionDenied;
        }
        #[cfg(unix)]
        {
            if err.raw_os_error() == Some(libc::ENOTDIR) {
                return FsFailure::PathCollision;
            }
        }
        FsFailure::Other(err)
    }
}

impl FsFailure {
    fn into_error(self, path: &Path) -> RkError {
        match self {
            FsFailure::PermissionDenied => RkError::PermissionDenied(path.to_path_buf()),
            FsFailure::PathCollision => RkError::Filesystem {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "path component is not a directory"),
            },
            FsFailure::Other(source) => RkError::Filesystem {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

fn fs_err(path: &Path) -> impl FnOnce(io::Error) -> RkError + '_ {
    move |e| FsFailure::from(e).into_error(path)
}

/// What currently sits at `install_root/<name>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Absent,
    File,
    Directory,
}

/// How an icon ended up in the kernel directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconPlacement {
    Linked,
    Copied,
}

/// FileSystemDriver for one install root
#[derive(Debug, Clone)]
pub struct FileSystemDriver {
    root: PathBuf,
}

impl FileSystemDriver {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get kernel directory path
    pub fn kernel_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn entry_kind(&self, name: &str) -> Result<EntryKind> {
        let path = self.kernel_dir(name);
        match fs::symlink_metadata(&path) {
            Ok(_) if path.is_dir() => Ok(EntryKind::Directory),
            Ok(_) => Ok(EntryKind::File),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(EntryKind::Absent),
            Err(e) => match FsFailure::from(e) {
                FsFailure::PathCollision => Ok(EntryKind::Absent),
                other => Err(other.into_error(&path)),
            },
        }
    }

    /// Delete `install_root/<name>` if it is a plain file
    ///
    /// Returns true when a file was removed.
    pub fn remove_stale_file(&self, name: &str) -> Result<bool> {
        if self.entry_kind(name)? != EntryKind::File {
            return Ok(false);
        }
        let path = self.kernel_dir(name);
        warn!("Removing stale file {} in place of kernel directory", path.display());
        fs::remove_file(&path).map_err(fs_err(&path))?;
        Ok(true)
    }

    /// Create the kernel directory (and any missing parents) with mode 0755
    ///
    /// When a path component is a plain file, every file on the way from the
    /// target up to `/` is removed and creation is retried once. Returns true
    /// if that repair was needed.
    pub fn create_kernel_dir(&self, name: &str) -> Result<bool> {
        let path = self.kernel_dir(name);
        match create_dir_tree(&path) {
            Ok(()) => Ok(false),
            Err(FsFailure::PathCollision) => {
                warn!("Path collision creating {}, removing blocking files", path.display());
                remove_colliding_files(&path)?;
                create_dir_tree(&path).map_err(|f| f.into_error(&path))?;
                Ok(true)
            }
            Err(other) => Err(other.into_error(&path)),
        }
    }

    /// Hard-link `source` into the kernel directory, copying if linking fails
    pub fn place_icon(&self, name: &str, source: &Path, file_name: &str) -> Result<IconPlacement> {
        let target = self.kernel_dir(name).join(file_name);
        match fs::hard_link(source, &target) {
            Ok(()) => {
                debug!("Linked {} -> {}", source.display(), target.display());
                Ok(IconPlacement::Linked)
            }
            Err(link_err) => {
                debug!("Hard link of {} failed ({}), copying", source.display(), link_err);
                fs::copy(source, &target).map_err(fs_err(&target))?;
                Ok(IconPlacement::Copied)
            }
        }
    }

    /// Write `kernel.json` into the kernel directory
    pub fn write_descriptor(&self, name: &str, descriptor: &KernelDescriptor) -> Result<PathBuf> {
        let path = self.kernel_dir(name).join(DESCRIPTOR_FILE);
        let json = descriptor.to_json()?;
        fs::write(&path, json).map_err(fs_err(&path))?;
        Ok(path)
    }

    /// Remove `install_root/<name>`, whatever it is
    ///
    /// Returns false if nothing was there.
    pub fn remove_kernel(&self, name: &str) -> Result<bool> {
        let path = self.kernel_dir(name);
        let result = match self.entry_kind(name)? {
            EntryKind::Absent => return Ok(false),
            EntryKind::Directory => fs::remove_dir_all(&path),
            EntryKind::File => fs::remove_file(&path),
        };
        match result {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FsFailure::from(e).into_error(&path)),
        }
    }

    /// Names of the directories directly under the install root, ascending
    pub fn installed_dirs(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                match e.into_io_error() {
                    Some(io_err) => FsFailure::from(io_err).into_error(&path),
                    None => RkError::Filesystem {
                        path,
                        source: io::Error::new(io::ErrorKind::Other, "directory walk failed"),
                    },
                }
            })?;
            if entry.file_type().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

fn create_dir_tree(path: &Path) -> std::result::Result<(), FsFailure> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(KERNEL_DIR_MODE);
    }
    match builder.create(path) {
        Ok(()) => Ok(()),
        // The target itself is a file: recursive create reports "exists"
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && !path.is_dir() => {
            Err(FsFailure::PathCollision)
        }
        Err(e) => Err(FsFailure::from(e)),
    }
}

fn remove_colliding_files(target: &Path) -> Result<()> {
    for ancestor in target.ancestors() {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        if ancestor.is_file() {
            warn!("Removing file {} blocking directory creation", ancestor.display());
            fs::remove_file(ancestor).map_err(fs_err(ancestor))?;
        }
    }
    Ok(())
}
