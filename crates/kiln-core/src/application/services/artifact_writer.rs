//! Artifact Writer - persists generated artifacts under a project root.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{Artifact, ArtifactKind, Dialect},
    error::KilnResult,
};

/// What to do when a generated file already exists with other content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    Overwrite,
    #[default]
    FailIfExists,
}

impl WritePolicy {
    pub fn from_force(force: bool) -> Self {
        if force { Self::Overwrite } else { Self::FailIfExists }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    Created,
    Overwritten,
    /// The file already held byte-identical content.
    Unchanged,
}

/// One artifact as it ended up on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenArtifact {
    pub path: String,
    pub kind: ArtifactKind,
    pub dialect: Dialect,
    pub outcome: WriteOutcome,
}

pub struct ArtifactWriter {
    filesystem: Arc<dyn Filesystem>,
}

impl ArtifactWriter {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Write every artifact below `root`.
    ///
    /// All targets are inspected before the first write, so a
    /// `FailIfExists` conflict leaves the whole list unwritten.
    pub fn write_all<'a>(
        &self,
        root: &Path,
        artifacts: impl IntoIterator<Item = &'a Artifact>,
        policy: WritePolicy,
    ) -> KilnResult<Vec<WrittenArtifact>> {
        let mut planned = Vec::new();
        for artifact in artifacts {
            let target = root.join(artifact.path().to_path_buf());
            let outcome = self.plan(&target, artifact.content(), policy)?;
            planned.push((artifact, target, outcome));
        }

        let mut written = Vec::with_capacity(planned.len());
        for (artifact, target, outcome) in planned {
            if outcome != WriteOutcome::Unchanged {
                if let Some(parent) = target.parent() {
                    self.filesystem.create_dir_all(parent)?;
                }
                self.filesystem.write_file(&target, artifact.content())?;
            }
            debug!(path = %artifact.path(), ?outcome, "artifact");

            written.push(WrittenArtifact {
                path: artifact.path().to_string(),
                kind: artifact.kind(),
                dialect: artifact.dialect(),
                outcome,
            });
        }

        Ok(written)
    }

    fn plan(&self, target: &Path, content: &str, policy: WritePolicy) -> KilnResult<WriteOutcome> {
        if !self.filesystem.exists(target) {
            return Ok(WriteOutcome::Created);
        }
        if self.filesystem.read_to_string(target)? == content {
            return Ok(WriteOutcome::Unchanged);
        }
        match policy {
            WritePolicy::Overwrite => Ok(WriteOutcome::Overwritten),
            WritePolicy::FailIfExists => Err(ApplicationError::ArtifactExists {
                path: PathBuf::from(target),
            }
            .into()),
        }
    }
}
