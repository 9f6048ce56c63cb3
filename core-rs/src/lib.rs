//! # rk core - remote jupyter kernel administration
//!
//! A remote kernel is a directory under the notebook front end's kernels
//! location holding a `kernel.json` and a couple of icons. Its `argv` runs a
//! launcher script that proxies execution to a remote host.
//!
//! ## Core Principle
//!
//! **The directory IS the installation**: there is no state besides the
//! install root itself. Listing reads the registry; install and uninstall act
//! on the filesystem.
//!
//! ```text
//! settings (YAML) ─┐
//!                  ├─> Installer ──> install_root/<name>/{kernel.json, logo-32.png, logo-64.png}
//! registry (JSON) ─┘   Uninstaller ─> removes install_root/<name>
//! ```

pub mod config;
pub mod descriptor;
pub mod drivers;
pub mod errors;
pub mod install;
pub mod privilege;
pub mod prompt;
pub mod registry;
pub mod ssh;
pub mod target;
pub mod uninstall;

pub use config::{Messages, Settings};
pub use descriptor::{KernelDescriptor, DESCRIPTOR_FILE};
pub use drivers::FileSystemDriver;
pub use errors::{Result, RkError};
pub use install::{InstallAction, InstallOutcome, Installer, ICON_SIZES};
pub use prompt::{Confirm, StdinConfirm};
pub use registry::{KernelSpec, Registry};
pub use ssh::SshSetup;
pub use target::KernelTarget;
pub use uninstall::Uninstaller;

/// Version of the rk tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
