use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoadError>;

/// Why the model artifacts could not be loaded
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Artifact '{name}' not found in {dir}")]
    Missing { name: &'static str, dir: PathBuf },

    #[error("Failed to read artifact {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Failed to decode artifact {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("Inconsistent artifacts: {0}")]
    Inconsistent(String),
}

impl LoadError {
    /// Stable identifier for the failure class
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Missing { .. } | LoadError::Io { .. } => "artifacts-missing",
            LoadError::Corrupt { .. } => "artifact-corrupt",
            LoadError::Inconsistent(_) => "artifact-inconsistent",
        }
    }
}

impl From<propai_core::Error> for LoadError {
    fn from(e: propai_core::Error) -> Self {
        LoadError::Inconsistent(e.to_string())
    }
}
