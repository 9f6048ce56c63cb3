//! `kernel.json` descriptor generation
//!
//! The notebook front end launches a kernel by running `argv`, which here is
//! always `[script, interpreter, connection_file, remote_host]`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::Settings;
use crate::errors::Result;
use crate::registry::KernelSpec;

/// Descriptor file name inside every kernel directory
pub const DESCRIPTOR_FILE: &str = "kernel.json";

/// Contents of `kernel.json`; field order matches sorted-key output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelDescriptor {
    pub argv: Vec<String>,
    pub display_name: String,
    pub language: String,
}

impl KernelDescriptor {
    pub fn for_spec(spec: &KernelSpec, settings: &Settings) -> Self {
        KernelDescriptor {
            argv: vec![
                settings.script_path.clone(),
                spec.interpreter.clone(),
                settings.connection_file_path.clone(),
                spec.remote_host.clone(),
            ],
            display_name: spec.display_name.clone(),
            language: spec.language.clone(),
        }
    }

    /// Serialized form: one-space indent, keys in alphabetical order
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
