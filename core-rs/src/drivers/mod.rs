//! Drivers module for install-root storage operations

mod filesystem;

pub use filesystem::{EntryKind, FileSystemDriver, FsFailure, IconPlacement, KERNEL_DIR_MODE};
