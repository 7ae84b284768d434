//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "scaffold a project" or "add a feature".

pub mod artifact_writer;
pub mod catalog_service;
pub mod feature_service;
pub mod manifest_service;
pub mod scaffold_service;
pub mod schematic_service;
pub mod variant_resolver;

#[cfg(test)]
pub(crate) mod testing;

use std::path::Path;

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::MANIFEST_FILE,
    error::KilnResult,
};

pub use artifact_writer::{ArtifactWriter, WriteOutcome, WritePolicy, WrittenArtifact};
pub use catalog_service::{CatalogService, FeatureInfo, SchematicInfo};
pub use feature_service::{FeatureApplication, FeatureService};
pub use manifest_service::ManifestService;
pub use scaffold_service::{
    PlannedArtifact, ScaffoldPhase, ScaffoldPlan, ScaffoldReport, ScaffoldService,
};
pub use schematic_service::SchematicService;
pub use variant_resolver::VariantResolver;

/// `generate` and `add` only run inside a directory holding a manifest.
pub(crate) fn require_project_root(filesystem: &dyn Filesystem, root: &Path) -> KilnResult<()> {
    if filesystem.exists(&root.join(MANIFEST_FILE)) {
        Ok(())
    } else {
        Err(ApplicationError::NotProjectRoot {
            path: root.to_path_buf(),
        }
        .into())
    }
}
