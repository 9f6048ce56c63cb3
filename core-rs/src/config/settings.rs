//! Settings file parser (YAML format)
//!
//! Format:
//! ```yaml
//! kernels_location: ~/.local/share/jupyter/kernels
//! img_location: img
//! logo_name: logo-{size}.png
//! script: rkscript
//! connection_file: "{connection_file}"
//! registry_path: kernels.json
//! kernel_name: template
//! display_name: Template
//! language: python
//! interpreter: python
//! remote_host: localhost
//! messages:
//!   installed: "Kernel '{name}' installed"
//! ```
//!
//! A leading `~` in `kernels_location` expands to `$HOME`. Relative
//! `img_location` and `registry_path` are resolved against the directory
//! holding the settings file.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Messages;
use crate::errors::{Result, RkError};
use crate::registry::KernelSpec;

/// Placeholder replaced by the icon size in `logo_name`
pub const SIZE_PLACEHOLDER: &str = "{size}";

/// Raw settings document as written on disk
#[derive(Debug, Clone, Deserialize)]
struct SettingsFile {
    kernels_location: String,
    img_location: String,
    logo_name: String,
    script: String,
    connection_file: String,
    registry_path: String,
    kernel_name: String,
    display_name: String,
    language: String,
    interpreter: String,
    remote_host: String,
    #[serde(default)]
    messages: Messages,
}

/// Resolved, read-only settings for one command invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory scanned by the notebook front end for kernel specs
    pub install_root: PathBuf,
    /// Directory holding the icon files
    pub icon_source_dir: PathBuf,
    /// Icon file name containing `{size}`, e.g. `logo-{size}.png`
    pub icon_name_pattern: String,
    /// First argv element of every generated descriptor
    pub script_path: String,
    /// Connection file argument handed to the script
    pub connection_file_path: String,
    /// Registry document location
    pub registry_path: PathBuf,
    /// Synthetic kernel installed by `install-template`
    pub template: KernelSpec,
    pub messages: Messages,
}

impl Settings {
    /// Load settings from a YAML file
    ///
    /// Fails with `RkError::Config` when the file is missing, malformed or
    /// lacks a required key.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RkError::Config(format!("cannot read settings file {}: {}", path.display(), e))
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_yaml_str(&content, base_dir)
            .map_err(|e| match e {
                RkError::Config(msg) => RkError::Config(format!("{}: {}", path.display(), msg)),
                other => other,
            })
    }

    /// Parse settings from YAML text, resolving relative paths against `base_dir`
    pub fn from_yaml_str(content: &str, base_dir: &Path) -> Result<Self> {
        let raw: SettingsFile =
            serde_yaml::from_str(content).map_err(|e| RkError::Config(e.to_string()))?;

        let required = [
            ("kernels_location", &raw.kernels_location),
            ("img_location", &raw.img_location),
            ("logo_name", &raw.logo_name),
            ("script", &raw.script),
            ("registry_path", &raw.registry_path),
            ("kernel_name", &raw.kernel_name),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(RkError::Config(format!("required key '{}' is empty", key)));
            }
        }

        if !raw.logo_name.contains(SIZE_PLACEHOLDER) {
            return Err(RkError::Config(format!(
                "logo_name '{}' must contain {}",
                raw.logo_name, SIZE_PLACEHOLDER
            )));
        }

        if !crate::registry::is_valid_kernel_name(&raw.logo_name) {
            return Err(RkError::Config(format!(
                "logo_name '{}' must be a plain file name",
                raw.logo_name
            )));
        }

        if !crate::registry::is_valid_kernel_name(&raw.kernel_name) {
            return Err(RkError::Config(format!(
                "kernel_name '{}' is not a valid directory name",
                raw.kernel_name
            )));
        }

        Ok(Settings {
            install_root: expand_home(&raw.kernels_location)?,
            icon_source_dir: resolve(base_dir, &raw.img_location),
            icon_name_pattern: raw.logo_name,
            script_path: raw.script,
            connection_file_path: raw.connection_file,
            registry_path: resolve(base_dir, &raw.registry_path),
            template: KernelSpec {
                name: raw.kernel_name,
                display_name: raw.display_name,
                language: raw.language,
                interpreter: raw.interpreter,
                remote_host: raw.remote_host,
            },
            messages: raw.messages,
        })
    }

    /// Default settings location: `$HOME/.config/rk/rk.yaml`
    pub fn default_path() -> Result<PathBuf> {
        let home = env::var("HOME")
            .map_err(|_| RkError::Config("HOME environment variable not set".to_string()))?;
        Ok(PathBuf::from(home).join(".config").join("rk").join("rk.yaml"))
    }

    /// Icon file name for the given size
    pub fn icon_name(&self, size: u32) -> String {
        self.icon_name_pattern.replace(SIZE_PLACEHOLDER, &size.to_string())
    }

    /// Icon source path for the given size
    pub fn icon_source(&self, size: u32) -> PathBuf {
        self.icon_source_dir.join(self.icon_name(size))
    }

    /// Name of the template kernel directory
    pub fn template_name(&self) -> &str {
        &self.template.name
    }
}

fn resolve(base_dir: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

fn expand_home(value: &str) -> Result<PathBuf> {
    // only the current user's home; `~name` stays literal
    let rest = match value.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return Ok(PathBuf::from(value)),
    };

    let home = env::var("HOME").map_err(|_| {
        RkError::Config(format!("cannot expand '{}': HOME environment variable not set", value))
    })?;
    let rest = rest.trim_start_matches('/');
    if rest.is_empty() {
        Ok(PathBuf::from(home))
    } else {
        Ok(PathBuf::from(home).join(rest))
    }
}
