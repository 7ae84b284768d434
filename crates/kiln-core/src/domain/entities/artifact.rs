//! Generated artifacts.
//!
//! An [`Artifact`] is one file a generator wants on disk. It records the
//! dialect it was rendered with so a pass can prove every file agrees.

use super::common::RelativePath;
use crate::domain::error::DomainError;
use crate::domain::value_objects::{ArtifactKind, Dialect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: RelativePath,
    content: String,
    kind: ArtifactKind,
    dialect: Dialect,
}

impl Artifact {
    pub fn new(
        path: &str,
        content: impl Into<String>,
        kind: ArtifactKind,
        dialect: Dialect,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            path: RelativePath::try_new(path)?,
            content: content.into(),
            kind,
            dialect,
        })
    }

    pub fn path(&self) -> &RelativePath {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

/// Ordered artifacts of one generator call with unique paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `artifact`, rejecting a second artifact at the same path.
    pub fn push(&mut self, artifact: Artifact) -> Result<(), DomainError> {
        if self.artifacts.iter().any(|a| a.path == artifact.path) {
            return Err(DomainError::DuplicatePath {
                path: artifact.path.to_string(),
            });
        }
        self.artifacts.push(artifact);
        Ok(())
    }

    pub fn extend(&mut self, other: ArtifactSet) -> Result<(), DomainError> {
        for artifact in other.artifacts {
            self.push(artifact)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
        self.artifacts.iter()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.path.as_str()).collect()
    }
}

impl IntoIterator for ArtifactSet {
    type Item = Artifact;
    type IntoIter = std::vec::IntoIter<Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.into_iter()
    }
}

impl<'a> IntoIterator for &'a ArtifactSet {
    type Item = &'a Artifact;
    type IntoIter = std::slice::Iter<'a, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.iter()
    }
}
