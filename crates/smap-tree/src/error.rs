//! Tree loading errors.

use std::path::PathBuf;

/// Error loading or validating a definition tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// File extension is neither JSON nor YAML.
    #[error("Unsupported tree file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    /// A definition breaks a structural rule.
    #[error("Invalid definition at {path}: {message}")]
    Invalid {
        /// Location in the tree (e.g., "`items[2].children[0]`").
        path: String,
        /// What is wrong.
        message: String,
    },
}
