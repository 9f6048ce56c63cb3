//! Kernel removal
//!
//! Explicit name lists are validated against the install root as a whole
//! before anything is deleted.

use std::collections::HashSet;
use tracing::info;

use crate::config::Settings;
use crate::drivers::{EntryKind, FileSystemDriver};
use crate::errors::{Result, RkError};
use crate::privilege;
use crate::registry::is_valid_kernel_name;
use crate::target::KernelTarget;

pub struct Uninstaller<'a> {
    settings: &'a Settings,
    driver: FileSystemDriver,
}

impl<'a> Uninstaller<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            driver: FileSystemDriver::new(settings.install_root.clone()),
        }
    }

    /// Remove the targeted kernels, returning the names removed
    pub fn uninstall(&self, target: &KernelTarget) -> Result<Vec<String>> {
        self.uninstall_reporting(target, &mut |_| {})
    }

    /// Like `uninstall`, calling `report` after each kernel is removed
    ///
    /// For `All` the names come back sorted; for explicit names they come back
    /// in request order.
    pub fn uninstall_reporting(
        &self,
        target: &KernelTarget,
        report: &mut dyn FnMut(&str),
    ) -> Result<Vec<String>> {
        let names = self.resolve(target)?;
        if names.is_empty() {
            return Ok(names);
        }
        privilege::ensure_writable(self.driver.root())?;

        let mut removed = Vec::with_capacity(names.len());
        for name in names {
            // vanished since validation: already gone
            if self.driver.remove_kernel(&name)? {
                info!("Uninstalled kernel {}", name);
            }
            report(&name);
            removed.push(name);
        }
        Ok(removed)
    }

    /// Names to remove, after validating them against the install root
    pub fn resolve(&self, target: &KernelTarget) -> Result<Vec<String>> {
        match target {
            KernelTarget::All => self.driver.installed_dirs(),
            KernelTarget::Template => {
                let name = self.settings.template_name();
                if self.driver.entry_kind(name)? == EntryKind::Absent {
                    return Err(RkError::NoTemplate(name.to_string()));
                }
                Ok(vec![name.to_string()])
            }
            KernelTarget::Names(requested) => {
                let mut seen = HashSet::new();
                let mut names = Vec::new();
                let mut missing = Vec::new();
                for name in requested {
                    if !seen.insert(name.as_str()) {
                        continue;
                    }
                    let present = is_valid_kernel_name(name)
                        && self.driver.entry_kind(name)? != EntryKind::Absent;
                    if present {
                        names.push(name.clone());
                    } else {
                        missing.push(name.clone());
                    }
                }
                if !missing.is_empty() {
                    return Err(RkError::UnknownKernel(missing));
                }
                Ok(names)
            }
        }
    }
}
