//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not generation
//! rules. Generation errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while driving a generation pass.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Target directory of `new` already exists.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// `generate`/`add` run outside a project.
    #[error("{path} is not a project root (no package.json)")]
    NotProjectRoot { path: PathBuf },

    /// A file with different content is in the way under `FailIfExists`.
    #[error("Refusing to overwrite {path}")]
    ArtifactExists { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The base template could not be acquired.
    #[error("Base template '{source_name}' failed: {reason}")]
    BaseTemplateFailed { source_name: String, reason: String },

    /// The manifest could not be serialized.
    #[error("Manifest error: {reason}")]
    ManifestError { reason: String },

    /// Shared state access failed (lock poisoned).
    #[error("Filesystem state is unavailable")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different project name".into(),
                "Or remove the directory first".into(),
            ],
            Self::NotProjectRoot { path } => vec![
                format!("No package.json in {}", path.display()),
                "Run the command from the project root, or pass -C <DIR>".into(),
            ],
            Self::ArtifactExists { path } => vec![
                format!("{} already exists with different content", path.display()),
                "Use --force to overwrite it".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::BaseTemplateFailed { .. } => vec![
                "Check that git is installed and the repository URL is reachable".into(),
                "Or drop --template-url to use the built-in skeleton".into(),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
            Self::ManifestError { .. } => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectExists { .. } | Self::ArtifactExists { .. } => ErrorCategory::Validation,
            Self::NotProjectRoot { .. } => ErrorCategory::NotFound,
            Self::BaseTemplateFailed { .. } => ErrorCategory::Configuration,
            Self::FilesystemError { .. } | Self::StoreLockError | Self::ManifestError { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}
