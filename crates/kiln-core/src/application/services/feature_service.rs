//! Feature Service - `kiln add <feature>` and the expansion step of `new`.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use super::{
    artifact_writer::{ArtifactWriter, WritePolicy, WrittenArtifact},
    manifest_service::ManifestService,
    require_project_root,
    variant_resolver::VariantResolver,
};
use crate::{
    application::ports::Filesystem,
    domain::{FeatureKind, ManifestPatch, OptionRecord, features},
    error::KilnResult,
};

/// Result of one feature module run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureApplication {
    pub feature: FeatureKind,
    pub artifacts: Vec<WrittenArtifact>,
    pub patch: ManifestPatch,
}

pub struct FeatureService {
    filesystem: Arc<dyn Filesystem>,
    resolver: VariantResolver,
    writer: ArtifactWriter,
    manifests: ManifestService,
}

impl FeatureService {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            resolver: VariantResolver::new(filesystem.clone()),
            writer: ArtifactWriter::new(filesystem.clone()),
            manifests: ManifestService::new(filesystem.clone()),
            filesystem,
        }
    }

    /// Add `feature` to the project at `root` and merge its manifest patch.
    ///
    /// The dialect comes from the project, not from `options`.
    #[instrument(skip_all, fields(feature = %feature, root = %root.display()))]
    pub fn apply_feature(
        &self,
        feature: FeatureKind,
        root: &Path,
        options: &OptionRecord,
        policy: WritePolicy,
    ) -> KilnResult<FeatureApplication> {
        require_project_root(self.filesystem.as_ref(), root)?;
        let options = options.with_dialect(self.resolver.resolve(root));

        let application = self.expand(feature, root, &options, policy)?;
        if !application.patch.is_empty() {
            self.manifests.merge(root, &application.patch)?;
        }

        info!(count = application.artifacts.len(), "feature applied");
        Ok(application)
    }

    /// Generate and write one feature without touching the manifest.
    pub(crate) fn expand(
        &self,
        feature: FeatureKind,
        root: &Path,
        options: &OptionRecord,
        policy: WritePolicy,
    ) -> KilnResult<FeatureApplication> {
        let output = features::apply(feature, options)?;
        let artifacts = self.writer.write_all(root, &output.artifacts, policy)?;

        Ok(FeatureApplication {
            feature,
            artifacts,
            patch: output.patch,
        })
    }
}
