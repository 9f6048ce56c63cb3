//! Error types for rk core

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RkError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Unknown kernel(s): {}", quote_names(.0))]
    UnknownKernel(Vec<String>),

    #[error("No template installed: {0}")]
    NoTemplate(String),

    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RkError {
    /// Names carried by an `UnknownKernel` error, empty otherwise
    pub fn unknown_names(&self) -> &[String] {
        match self {
            RkError::UnknownKernel(names) => names,
            _ => &[],
        }
    }
}

fn quote_names(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(" ")
}

pub type Result<T> = std::result::Result<T, RkError>;
