//! Manifest Service - reads, merges and writes `package.json`.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{MANIFEST_FILE, Manifest, ManifestPatch},
    error::KilnResult,
};

pub struct ManifestService {
    filesystem: Arc<dyn Filesystem>,
}

impl ManifestService {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Read the manifest at `root`.
    ///
    /// A missing or unparsable file yields the minimal default named after
    /// the directory.
    pub fn load(&self, root: &Path) -> Manifest {
        let path = root.join(MANIFEST_FILE);
        let fallback = || Manifest::default_for(directory_name(root));

        if !self.filesystem.exists(&path) {
            debug!(path = %path.display(), "no manifest, using default");
            return fallback();
        }

        match self.filesystem.read_to_string(&path) {
            Ok(json) => Manifest::from_json(&json).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "unparsable manifest, using default");
                fallback()
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable manifest, using default");
                fallback()
            }
        }
    }

    pub fn save(&self, root: &Path, manifest: &Manifest) -> KilnResult<()> {
        let json = manifest
            .to_json()
            .map_err(|e| ApplicationError::ManifestError {
                reason: e.to_string(),
            })?;
        self.filesystem.write_file(&root.join(MANIFEST_FILE), &json)
    }

    /// Fold `patch` into the manifest at `root` and write it back.
    pub fn merge(&self, root: &Path, patch: &ManifestPatch) -> KilnResult<Manifest> {
        let mut manifest = self.load(root);
        manifest.merge(patch);
        self.save(root, &manifest)?;
        Ok(manifest)
    }

    /// Merge, strip generator-only fields and rename to `project_name`.
    pub fn merge_and_sanitize(
        &self,
        root: &Path,
        patch: &ManifestPatch,
        project_name: &str,
    ) -> KilnResult<Manifest> {
        let mut manifest = self.load(root);
        manifest.merge(patch);
        manifest.sanitize(project_name);
        self.save(root, &manifest)?;
        Ok(manifest)
    }
}

fn directory_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "app".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::application::services::testing::FakeFilesystem;

    #[test]
    fn missing_manifest_defaults_to_directory_name() {
        let fs = Arc::new(FakeFilesystem::default());
        let manifests = ManifestService::new(fs);
        let manifest = manifests.load(Path::new("/work/orders-api"));
        assert_eq!(manifest.name, "orders-api");
        assert_eq!(manifest.version, "1.0.0");
        assert!(manifest.dependencies.is_empty());
    }

    #[test]
    fn unparsable_manifest_is_recovered() {
        let fs = Arc::new(FakeFilesystem::default());
        fs.seed("/work/api/package.json", "{ not json");
        let manifests = ManifestService::new(fs);
        assert_eq!(manifests.load(Path::new("/work/api")).name, "api");
    }

    #[test]
    fn merge_is_additive_and_keeps_unrelated_fields() {
        let fs = Arc::new(FakeFilesystem::default());
        fs.seed(
            "/work/api/package.json",
            r#"{"name":"api","version":"2.0.0","license":"MIT","dependencies":{"express":"^4.21.2","axios":"^1.0.0"}}"#,
        );
        let manifests = ManifestService::new(fs.clone());

        let patch = ManifestPatch::new()
            .dependency("axios", "^1.7.9")
            .script("test", "jest");
        manifests.merge(Path::new("/work/api"), &patch).unwrap();

        let written = fs.file("/work/api/package.json").unwrap();
        assert!(written.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["version"], "2.0.0");
        assert_eq!(value["license"], "MIT");
        assert_eq!(value["dependencies"]["express"], "^4.21.2");
        assert_eq!(value["dependencies"]["axios"], "^1.7.9");
        assert_eq!(value["scripts"]["test"], "jest");
    }

    #[test]
    fn sanitize_renames_and_strips() {
        let fs = Arc::new(FakeFilesystem::default());
        fs.seed(
            "/work/shop/package.json",
            r#"{"name":"starter","bin":{"starter":"cli.js"},"dependencies":{"commander":"^12.0.0","express":"^4.21.2"},"scripts":{"postinstall":"node setup.js"}}"#,
        );
        let manifests = ManifestService::new(fs);

        let manifest = manifests
            .merge_and_sanitize(Path::new("/work/shop"), &ManifestPatch::new(), "shop")
            .unwrap();

        assert_eq!(manifest.name, "shop");
        assert!(!manifest.extra.contains_key("bin"));
        assert!(!manifest.dependencies.contains_key("commander"));
        assert!(manifest.dependencies.contains_key("express"));
        assert!(manifest.scripts.is_empty());
    }

    #[test]
    fn write_failure_after_read_is_fatal() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_write_file().returning(|path, _| {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "read-only".into(),
            }
            .into())
        });
        let manifests = ManifestService::new(Arc::new(fs));

        assert!(manifests
            .merge(Path::new("/work/api"), &ManifestPatch::new())
            .is_err());
    }
}
