//! Typed view of `package.json` and the patches generators fold into it.
//!
//! # Merge semantics
//!
//! A [`ManifestPatch`] only ever adds or replaces keys. For the same key the
//! patch value wins; keys the patch does not mention are left alone. Nothing
//! is ever deleted by a merge. Deletion happens only in [`Manifest::sanitize`].
//!
//! Fields the model does not name are kept verbatim in `extra`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Manifest file name at the project root.
pub const MANIFEST_FILE: &str = "package.json";

/// Top-level packaging fields a generated service must not inherit.
pub const PACKAGING_FIELDS: &[&str] = &[
    "bin",
    "files",
    "publishConfig",
    "preferGlobal",
    "repository",
    "bugs",
    "homepage",
];

/// Packages that belong to the generator itself, never to its output.
pub const GENERATOR_DEPENDENCIES: &[&str] = &[
    "kiln",
    "kiln-cli",
    "commander",
    "inquirer",
    "ora",
    "chalk",
    "fs-extra",
    "degit",
];

/// Lifecycle scripts used to publish the generator.
pub const GENERATOR_SCRIPTS: &[&str] = &["prepublishOnly", "prepack", "postpack", "postinstall"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub scripts: BTreeMap<String, String>,

    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl Manifest {
    /// Minimal manifest for a directory that has none.
    pub fn default_for(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            scripts: BTreeMap::new(),
            dependencies: BTreeMap::new(),
            dev_dependencies: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Pretty JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Fold `patch` in, patch value winning per key.
    pub fn merge(&mut self, patch: &ManifestPatch) {
        extend(&mut self.dependencies, &patch.dependencies);
        extend(&mut self.dev_dependencies, &patch.dev_dependencies);
        extend(&mut self.scripts, &patch.scripts);
    }

    /// Strip generator-only metadata and rename to `project_name`.
    pub fn sanitize(&mut self, project_name: &str) {
        for field in PACKAGING_FIELDS {
            self.extra.remove(*field);
        }
        for dep in GENERATOR_DEPENDENCIES {
            self.dependencies.remove(*dep);
            self.dev_dependencies.remove(*dep);
        }
        for script in GENERATOR_SCRIPTS {
            self.scripts.remove(*script);
        }
        self.name = project_name.to_string();
    }
}

fn extend(target: &mut BTreeMap<String, String>, source: &BTreeMap<String, String>) {
    for (key, value) in source {
        target.insert(key.clone(), value.clone());
    }
}

/// Partial manifest produced by one generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestPatch {
    pub dependencies: BTreeMap<String, String>,
    #[serde(rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
    pub scripts: BTreeMap<String, String>,
}

impl ManifestPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dependency(mut self, name: &str, version: &str) -> Self {
        self.dependencies.insert(name.to_string(), version.to_string());
        self
    }

    pub fn dev_dependency(mut self, name: &str, version: &str) -> Self {
        self.dev_dependencies
            .insert(name.to_string(), version.to_string());
        self
    }

    pub fn script(mut self, name: &str, command: &str) -> Self {
        self.scripts.insert(name.to_string(), command.to_string());
        self
    }

    /// Accumulate another patch; `other` wins per key.
    pub fn absorb(&mut self, other: &ManifestPatch) {
        extend(&mut self.dependencies, &other.dependencies);
        extend(&mut self.dev_dependencies, &other.dev_dependencies);
        extend(&mut self.scripts, &other.scripts);
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dev_dependencies.is_empty() && self.scripts.is_empty()
    }
}
