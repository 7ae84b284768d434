//! Driven (output) ports - implemented by infrastructure.
//!
//! The `kiln-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{Artifact, OptionRecord};
use crate::error::KilnResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `kiln_adapters::filesystem::LocalFilesystem` (production)
/// - `kiln_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> KilnResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()>;

    fn read_to_string(&self, path: &Path) -> KilnResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for the base project a `new` pass starts from.
///
/// Implemented by:
/// - `kiln_adapters::base_template::BuiltinTemplate` (no network)
/// - `kiln_adapters::base_template::GitTemplate` (`git clone --depth 1`)
#[cfg_attr(test, mockall::automock)]
pub trait BaseTemplateSource: Send + Sync {
    /// Short label for logs and reports.
    fn name(&self) -> String;

    /// Produce the base files of a project, relative to its root.
    fn acquire(&self, project_name: &str, options: &OptionRecord) -> KilnResult<Vec<Artifact>>;
}
