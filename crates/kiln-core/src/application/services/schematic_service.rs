//! Schematic Service - `kiln generate <kind> <name>`.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use super::{
    artifact_writer::{ArtifactWriter, WritePolicy, WrittenArtifact},
    require_project_root,
    variant_resolver::VariantResolver,
};
use crate::{
    application::ports::Filesystem,
    domain::{SchematicKind, schematics},
    error::KilnResult,
};

pub struct SchematicService {
    filesystem: Arc<dyn Filesystem>,
    resolver: VariantResolver,
    writer: ArtifactWriter,
}

impl SchematicService {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            resolver: VariantResolver::new(filesystem.clone()),
            writer: ArtifactWriter::new(filesystem.clone()),
            filesystem,
        }
    }

    /// Render `kind` for `name` in the project's dialect and write it.
    #[instrument(skip_all, fields(kind = %kind, name = %name, root = %root.display()))]
    pub fn generate(
        &self,
        kind: SchematicKind,
        name: &str,
        root: &Path,
        policy: WritePolicy,
    ) -> KilnResult<Vec<WrittenArtifact>> {
        require_project_root(self.filesystem.as_ref(), root)?;
        let dialect = self.resolver.resolve(root);

        let artifacts = schematics::generate(kind, name, dialect)?;
        let written = self.writer.write_all(root, &artifacts, policy)?;

        info!(count = written.len(), %dialect, "schematic generated");
        Ok(written)
    }
}
