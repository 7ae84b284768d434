//! Scaffold Service - main application orchestrator.
//!
//! A `new` pass runs these phases in order and stops at the first failure:
//! 1. Preflight: the target directory must not exist
//! 2. BaseTemplate: the base template source populates the target; the
//!    pass dialect is then read from what it wrote
//! 3. FeatureExpansion: every enabled feature, in registry order
//! 4. ManifestSanitization: merge the collected patches, sanitize, write
//! 5. Completion: build the report
//!
//! Nothing is rolled back after a failure; files already written stay.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::{
    artifact_writer::{ArtifactWriter, WriteOutcome, WritePolicy, WrittenArtifact},
    feature_service::FeatureService,
    manifest_service::ManifestService,
    variant_resolver::VariantResolver,
};
use crate::{
    application::{
        ApplicationError,
        ports::{BaseTemplateSource, Filesystem},
    },
    domain::{
        ArtifactKind, DataAccess, Dialect, DomainValidator as validator, FeatureKind, MANIFEST_FILE,
        Manifest, ManifestPatch, OptionRecord, features,
    },
    error::KilnResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaffoldPhase {
    Preflight,
    BaseTemplate,
    FeatureExpansion,
    ManifestSanitization,
    Completion,
}

impl fmt::Display for ScaffoldPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Preflight => "preflight",
            Self::BaseTemplate => "base-template",
            Self::FeatureExpansion => "feature-expansion",
            Self::ManifestSanitization => "manifest-sanitization",
            Self::Completion => "completion",
        };
        f.write_str(name)
    }
}

/// Outcome of a completed `new` pass.
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldReport {
    pub pass_id: Uuid,
    pub project_name: String,
    pub root: PathBuf,
    pub dialect: Dialect,
    pub data_access: Option<DataAccess>,
    pub base_template: String,
    pub features: Vec<FeatureKind>,
    /// Every file written, base template first.
    pub artifacts: Vec<WrittenArtifact>,
    pub manifest: Manifest,
}

/// What a pass would write, without writing it.
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldPlan {
    pub project_name: String,
    pub dialect: Dialect,
    pub features: Vec<FeatureKind>,
    pub artifacts: Vec<PlannedArtifact>,
    pub patch: ManifestPatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedArtifact {
    pub path: String,
    pub kind: ArtifactKind,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Arc<dyn Filesystem>,
    base: Arc<dyn BaseTemplateSource>,
    resolver: VariantResolver,
    writer: ArtifactWriter,
    features: FeatureService,
    manifests: ManifestService,
}

impl ScaffoldService {
    pub fn new(filesystem: Arc<dyn Filesystem>, base: Arc<dyn BaseTemplateSource>) -> Self {
        Self {
            resolver: VariantResolver::new(filesystem.clone()),
            writer: ArtifactWriter::new(filesystem.clone()),
            features: FeatureService::new(filesystem.clone()),
            manifests: ManifestService::new(filesystem.clone()),
            filesystem,
            base,
        }
    }

    /// Scaffold a new project named `project_name` at `root`.
    ///
    /// The base template decides the dialect: every feature is rendered for
    /// the dialect its marker file announces, whatever `options` asked for.
    #[instrument(
        skip_all,
        fields(
            project = %project_name,
            root = %root.display(),
            dialect = %options.dialect(),
            base = %self.base.name()
        )
    )]
    pub fn scaffold(
        &self,
        project_name: &str,
        root: &Path,
        options: &OptionRecord,
    ) -> KilnResult<ScaffoldReport> {
        let pass_id = Uuid::new_v4();
        info!(%pass_id, "scaffold pass started");

        self.phase(ScaffoldPhase::Preflight, || self.preflight(project_name, root))?;

        let (mut artifacts, options) = self.phase(ScaffoldPhase::BaseTemplate, || {
            let base = self.base.acquire(project_name, options)?;
            self.filesystem.create_dir_all(root)?;
            let written = self.writer.write_all(root, &base, WritePolicy::Overwrite)?;
            let options = self.settle_dialect(options, self.resolver.resolve(root));
            let dialect = options.dialect();
            let written = written
                .into_iter()
                .map(|artifact| WrittenArtifact { dialect, ..artifact })
                .collect::<Vec<_>>();
            Ok((written, options))
        })?;
        let options = &options;

        let (enabled, patch) = self.phase(ScaffoldPhase::FeatureExpansion, || {
            let mut enabled = Vec::new();
            let mut patch = ManifestPatch::new();
            for def in features::enabled(options) {
                let applied = self
                    .features
                    .expand(def.kind, root, options, WritePolicy::Overwrite)?;
                info!(feature = %def.kind, count = applied.artifacts.len(), "feature expanded");
                patch.absorb(&applied.patch);
                artifacts.extend(applied.artifacts);
                enabled.push(def.kind);
            }
            Ok((enabled, patch))
        })?;

        let manifest = self.phase(ScaffoldPhase::ManifestSanitization, || {
            let existed = self.filesystem.exists(&root.join(MANIFEST_FILE));
            let manifest = self.manifests.merge_and_sanitize(root, &patch, project_name)?;
            if !artifacts.iter().any(|a| a.path == MANIFEST_FILE) {
                artifacts.push(WrittenArtifact {
                    path: MANIFEST_FILE.to_string(),
                    kind: ArtifactKind::Config,
                    dialect: options.dialect(),
                    outcome: if existed {
                        WriteOutcome::Overwritten
                    } else {
                        WriteOutcome::Created
                    },
                });
            }
            Ok(manifest)
        })?;

        self.phase(ScaffoldPhase::Completion, || {
            info!(%pass_id, files = artifacts.len(), "scaffold completed");
            Ok(ScaffoldReport {
                pass_id,
                project_name: project_name.to_string(),
                root: root.to_path_buf(),
                dialect: options.dialect(),
                data_access: options.data_access(),
                base_template: self.base.name(),
                features: enabled,
                artifacts,
                manifest,
            })
        })
    }

    /// List what `scaffold` would write, touching nothing on disk.
    pub fn plan(&self, project_name: &str, options: &OptionRecord) -> KilnResult<ScaffoldPlan> {
        validator::validate_project_name(project_name)?;

        let base = self.base.acquire(project_name, options)?;
        let marked = base
            .iter()
            .any(|a| a.path().as_str() == Dialect::MARKER_FILE);
        let options = &self.settle_dialect(options, Dialect::from_marker(marked));

        let mut artifacts: Vec<PlannedArtifact> = base
            .iter()
            .map(|a| PlannedArtifact {
                path: a.path().to_string(),
                kind: a.kind(),
            })
            .collect();

        let mut enabled = Vec::new();
        let mut patch = ManifestPatch::new();
        for def in features::enabled(options) {
            let output = (def.generate)(options)?;
            artifacts.extend(output.artifacts.iter().map(|a| PlannedArtifact {
                path: a.path().to_string(),
                kind: a.kind(),
            }));
            patch.absorb(&output.patch);
            enabled.push(def.kind);
        }

        Ok(ScaffoldPlan {
            project_name: project_name.to_string(),
            dialect: options.dialect(),
            features: enabled,
            artifacts,
            patch,
        })
    }

    /// Options re-targeted at the dialect the base template turned out to be.
    fn settle_dialect(&self, options: &OptionRecord, found: Dialect) -> OptionRecord {
        if found != options.dialect() {
            warn!(
                requested = %options.dialect(),
                %found,
                "base template dialect differs from the requested one; following the template"
            );
        }
        options.with_dialect(found)
    }

    fn preflight(&self, project_name: &str, root: &Path) -> KilnResult<()> {
        validator::validate_project_name(project_name)?;
        if self.filesystem.exists(root) {
            return Err(ApplicationError::ProjectExists {
                path: root.to_path_buf(),
            }
            .into());
        }
        Ok(())
    }

    fn phase<T>(
        &self,
        phase: ScaffoldPhase,
        run: impl FnOnce() -> KilnResult<T>,
    ) -> KilnResult<T> {
        info!(%phase, "phase");
        run().inspect_err(|e| error!(%phase, error = %e, "scaffold failed"))
    }
}
