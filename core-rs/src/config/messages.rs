//! User-facing report strings
//!
//! Every line the CLI prints comes from here. The defaults are English; any
//! subset can be overridden from the `messages:` table of the settings file.
//! Placeholders are `{name}`, `{names}`, `{path}` and `{error}`.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub installed: String,
    pub installed_template: String,
    pub delete_prompt: String,
    pub delete_template_prompt: String,
    pub kept: String,
    pub uninstalled: String,
    pub uninstalled_template: String,
    pub uninstalled_all_zero: String,
    pub uninstalled_all_one: String,
    pub uninstalled_all_many: String,
    pub error_no_kernel: String,
    pub error_no_kernels: String,
    pub error_no_template: String,
    pub error_no_root: String,
    pub error_oops: String,
    pub ask_remote_host: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            installed: "Kernel '{name}' installed".to_string(),
            installed_template: "Template kernel '{name}' installed".to_string(),
            delete_prompt: "Kernel '{name}' already installed. Delete it and install again? [y/N]: ".to_string(),
            delete_template_prompt: "Template kernel '{name}' already installed. Delete it and install again? [y/N]: ".to_string(),
            kept: "Kernel '{name}' left as is".to_string(),
            uninstalled: "Kernel '{name}' uninstalled".to_string(),
            uninstalled_template: "Template kernel '{name}' uninstalled".to_string(),
            uninstalled_all_zero: "No kernels to uninstall".to_string(),
            uninstalled_all_one: "Kernel '{name}' uninstalled".to_string(),
            uninstalled_all_many: "Kernels {names} uninstalled".to_string(),
            error_no_kernel: "Error: kernel '{name}' not found".to_string(),
            error_no_kernels: "Error: kernels {names} not found".to_string(),
            error_no_template: "Error: template kernel '{name}' not installed".to_string(),
            error_no_root: "Error: permission denied for {path}. Try again with sudo".to_string(),
            error_oops: "Oops: {error}".to_string(),
            ask_remote_host: "Remote host ([username@]hostname): ".to_string(),
        }
    }
}

impl Messages {
    pub fn installed(&self, name: &str, template: bool) -> String {
        let tpl = if template { &self.installed_template } else { &self.installed };
        fill(tpl, "name", name)
    }

    pub fn delete_prompt(&self, name: &str, template: bool) -> String {
        let tpl = if template { &self.delete_template_prompt } else { &self.delete_prompt };
        fill(tpl, "name", name)
    }

    pub fn kept(&self, name: &str) -> String {
        fill(&self.kept, "name", name)
    }

    pub fn uninstalled(&self, name: &str, template: bool) -> String {
        let tpl = if template { &self.uninstalled_template } else { &self.uninstalled };
        fill(tpl, "name", name)
    }

    /// Summary for `uninstall-all`, worded by how many kernels went away
    pub fn uninstalled_all(&self, names: &[String]) -> String {
        match names {
            [] => self.uninstalled_all_zero.clone(),
            [one] => fill(&self.uninstalled_all_one, "name", one),
            many => fill(&self.uninstalled_all_many, "names", &quote_all(many)),
        }
    }

    pub fn unknown_kernels(&self, names: &[String]) -> String {
        match names {
            [one] => fill(&self.error_no_kernel, "name", one),
            many => fill(&self.error_no_kernels, "names", &quote_all(many)),
        }
    }

    pub fn no_template(&self, name: &str) -> String {
        fill(&self.error_no_template, "name", name)
    }

    pub fn no_root(&self, path: &Path) -> String {
        fill(&self.error_no_root, "path", &path.display().to_string())
    }

    pub fn oops(&self, error: &str) -> String {
        fill(&self.error_oops, "error", error)
    }
}

fn fill(template: &str, key: &str, value: &str) -> String {
    template.replace(&format!("{{{}}}", key), value)
}

fn quote_all(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(" ")
}
