//! Kernel installation
//!
//! A request is resolved against the registry in full before the install root
//! is touched, so an invalid name list never results in a partial install.
//! Kernels are then installed one by one in ascending name order.
//!
//! Per kernel:
//! 1. a plain file at `install_root/<name>` is deleted
//! 2. if nothing is there, the directory is created and populated
//! 3. if a directory is there, the user is asked whether to replace it; on
//!    "yes" it is uninstalled and installed again, exactly once

use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::descriptor::KernelDescriptor;
use crate::drivers::{EntryKind, FileSystemDriver, IconPlacement};
use crate::errors::{Result, RkError};
use crate::privilege;
use crate::prompt::Confirm;
use crate::registry::{KernelSpec, Registry};
use crate::target::KernelTarget;
use crate::uninstall::Uninstaller;

/// Icon sizes copied into every kernel directory
pub const ICON_SIZES: [u32; 2] = [32, 64];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallAction {
    /// Directory was absent and has been created
    Installed,
    /// Directory existed, the user confirmed, it was recreated
    Reinstalled,
    /// Directory existed and the user declined; left untouched
    Kept,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub name: String,
    pub template: bool,
    pub action: InstallAction,
}

pub struct Installer<'a> {
    settings: &'a Settings,
    registry: &'a Registry,
    driver: FileSystemDriver,
}

impl<'a> Installer<'a> {
    pub fn new(settings: &'a Settings, registry: &'a Registry) -> Self {
        Self {
            settings,
            registry,
            driver: FileSystemDriver::new(settings.install_root.clone()),
        }
    }

    /// Kernels a target stands for, ascending by name
    ///
    /// Fails with `UnknownKernel` listing every name missing from the registry.
    pub fn resolve(&self, target: &KernelTarget) -> Result<Vec<KernelSpec>> {
        match target {
            KernelTarget::Names(names) => self.registry.resolve(names),
            KernelTarget::Template => Ok(vec![self.settings.template.clone()]),
            KernelTarget::All => Ok(self.registry.specs().cloned().collect()),
        }
    }

    pub fn install(&self, target: &KernelTarget, confirm: &mut dyn Confirm) -> Result<Vec<InstallOutcome>> {
        self.install_reporting(target, confirm, &mut |_| {})
    }

    /// Like `install`, calling `report` as soon as each kernel is done
    pub fn install_reporting(
        &self,
        target: &KernelTarget,
        confirm: &mut dyn Confirm,
        report: &mut dyn FnMut(&InstallOutcome),
    ) -> Result<Vec<InstallOutcome>> {
        let specs = self.resolve(target)?;
        privilege::ensure_writable(self.driver.root())?;

        let template = target.is_template();
        let mut outcomes = Vec::with_capacity(specs.len());
        for spec in &specs {
            let outcome = self.install_one(spec, template, confirm)?;
            report(&outcome);
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    fn install_one(&self, spec: &KernelSpec, template: bool, confirm: &mut dyn Confirm) -> Result<InstallOutcome> {
        let mut replaced = false;
        loop {
            self.driver.remove_stale_file(&spec.name)?;

            match self.driver.entry_kind(&spec.name)? {
                EntryKind::Absent | EntryKind::File => {
                    self.populate(spec)?;
                    let action = if replaced {
                        InstallAction::Reinstalled
                    } else {
                        InstallAction::Installed
                    };
                    info!("Installed kernel {} ({:?})", spec.name, action);
                    return Ok(InstallOutcome {
                        name: spec.name.clone(),
                        template,
                        action,
                    });
                }
                EntryKind::Directory if replaced => {
                    return Err(RkError::Filesystem {
                        path: self.driver.kernel_dir(&spec.name),
                        source: std::io::Error::new(
                            std::io::ErrorKind::AlreadyExists,
                            "kernel directory still present after removal",
                        ),
                    });
                }
                EntryKind::Directory => {
                    let question = self.settings.messages.delete_prompt(&spec.name, template);
                    if !confirm.confirm(&question)? {
                        debug!("Keeping existing kernel {}", spec.name);
                        return Ok(InstallOutcome {
                            name: spec.name.clone(),
                            template,
                            action: InstallAction::Kept,
                        });
                    }
                    Uninstaller::new(self.settings).uninstall(&KernelTarget::names([spec.name.as_str()]))?;
                    replaced = true;
                }
            }
        }
    }

    fn populate(&self, spec: &KernelSpec) -> Result<()> {
        if self.driver.create_kernel_dir(&spec.name)? {
            info!("Repaired path collision for {}", spec.name);
        }

        // a kernel directory without kernel.json must not outlive a failure
        if let Err(err) = self.fill_kernel_dir(spec) {
            warn!("Installing {} failed, removing partial directory", spec.name);
            self.driver.remove_kernel(&spec.name)?;
            return Err(err);
        }
        Ok(())
    }

    fn fill_kernel_dir(&self, spec: &KernelSpec) -> Result<()> {
        for size in ICON_SIZES {
            let source = self.settings.icon_source(size);
            if !source.is_file() {
                debug!("Icon {} not found, skipping", source.display());
                continue;
            }
            let placement = self
                .driver
                .place_icon(&spec.name, &source, &self.settings.icon_name(size))?;
            if placement == IconPlacement::Copied {
                debug!("Icon {} copied for {}", size, spec.name);
            }
        }

        let descriptor = KernelDescriptor::for_spec(spec, self.settings);
        self.driver.write_descriptor(&spec.name, &descriptor)?;
        Ok(())
    }
}
