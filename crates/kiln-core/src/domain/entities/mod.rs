pub mod artifact;
pub mod common;
pub mod manifest;
pub mod options;

pub use crate::domain::DomainError;
pub use artifact::{Artifact, ArtifactSet};
pub use common::RelativePath;
pub use manifest::{Manifest, ManifestPatch, MANIFEST_FILE};
pub use options::{OptionRecord, OptionRecordBuilder};
