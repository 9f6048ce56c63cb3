//! Kernel registry
//!
//! Static JSON mapping of kernel name to launch metadata:
//!
//! ```json
//! {
//!   "python3-server": {
//!     "display_name": "Python 3 (server)",
//!     "language": "python",
//!     "interpreter": "python3",
//!     "remote_host": "user@server"
//!   }
//! }
//! ```
//!
//! Keys are kept in a `BTreeMap`, so every listing and expansion of the
//! registry is in ascending name order regardless of document order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::errors::{Result, RkError};

/// One launchable remote kernel profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelSpec {
    /// Unique key, also the directory name under the install root
    #[serde(skip)]
    pub name: String,
    pub display_name: String,
    pub language: String,
    pub interpreter: String,
    pub remote_host: String,
}

/// Read-only name → spec mapping for one command invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    kernels: BTreeMap<String, KernelSpec>,
}

impl Registry {
    /// Load the registry document
    ///
    /// Fails with `RkError::Registry` when the file cannot be read, the JSON
    /// is malformed, or any entry lacks a required field.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RkError::Registry(format!("cannot read registry {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
            .map_err(|e| RkError::Registry(format!("{}: {}", path.display(), registry_detail(e))))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let entries: BTreeMap<String, KernelSpec> =
            serde_json::from_str(content).map_err(|e| RkError::Registry(e.to_string()))?;

        let mut kernels = BTreeMap::new();
        for (name, mut spec) in entries {
            if !is_valid_kernel_name(&name) {
                return Err(RkError::Registry(format!(
                    "kernel name '{}' is not a valid directory name",
                    name
                )));
            }
            spec.name = name.clone();
            kernels.insert(name, spec);
        }

        Ok(Registry { kernels })
    }

    pub fn get(&self, name: &str) -> Option<&KernelSpec> {
        self.kernels.get(name)
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// All kernel names, ascending
    pub fn names(&self) -> Vec<String> {
        self.kernels.keys().cloned().collect()
    }

    /// All specs, ascending by name
    pub fn specs(&self) -> impl Iterator<Item = &KernelSpec> {
        self.kernels.values()
    }

    /// Installable kernels as `(name, display_name)`, ascending by name
    ///
    /// Derived from the registry only; what is on disk does not matter.
    pub fn list(&self) -> Vec<(String, String)> {
        self.kernels
            .values()
            .map(|s| (s.name.clone(), s.display_name.clone()))
            .collect()
    }

    /// Resolve every requested name or fail with all unresolved ones at once
    ///
    /// The result is sorted ascending and free of duplicates.
    pub fn resolve(&self, names: &[String]) -> Result<Vec<KernelSpec>> {
        let missing: Vec<String> = names
            .iter()
            .filter(|n| !self.kernels.contains_key(n.as_str()))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if !missing.is_empty() {
            return Err(RkError::UnknownKernel(missing));
        }

        let wanted: BTreeSet<&str> = names.iter().map(String::as_str).collect();
        Ok(wanted
            .into_iter()
            .filter_map(|n| self.kernels.get(n).cloned())
            .collect())
    }
}

/// A kernel name must be a single, ordinary path component
pub fn is_valid_kernel_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

fn registry_detail(err: RkError) -> String {
    match err {
        RkError::Registry(msg) => msg,
        other => other.to_string(),
    }
}
