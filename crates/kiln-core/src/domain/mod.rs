//! Core domain layer for Kiln.
//!
//! Pure generation logic: options, naming, rendering, schematics, feature
//! modules and the manifest model. No I/O and no logging happen here; the
//! application layer drives the domain through ports.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: no filesystem, network or process calls
//! - **Deterministic**: identical inputs produce byte-identical artifacts
//! - **Immutable inputs**: an `OptionRecord` is frozen once built

pub mod capabilities;
pub mod entities;
pub mod error;
pub mod features;
pub mod naming;
pub mod rendering;
pub mod schematics;
pub mod value_objects;

mod validation;

pub use entities::{
    Artifact, ArtifactSet, Manifest, ManifestPatch, OptionRecord, OptionRecordBuilder,
    RelativePath, MANIFEST_FILE,
};
pub use error::{DomainError, ErrorCategory};
pub use features::{FeatureDef, FeatureOutput, FEATURE_REGISTRY};
pub use naming::NameConvention;
pub use rendering::RenderContext;
pub use validation::DomainValidator;
pub use value_objects::{
    ArtifactKind, DataAccess, DataAccessChoice, DemoKind, Dialect, FeatureKind, MessagingBackend,
    MonitoringTool, PersistenceBackend, RateLimitStore, SchematicKind,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_auto_with_auth_merges_exactly_prisma_and_auth() {
        let options = OptionRecord::builder()
            .dialect(Dialect::Typed)
            .persistence(PersistenceBackend::Postgres)
            .data_access(DataAccessChoice::Auto)
            .auth(true)
            .build()
            .unwrap();
        assert_eq!(options.data_access(), Some(DataAccess::Prisma));

        let mut patch = ManifestPatch::new();
        for def in features::enabled(&options) {
            patch.absorb(&(def.generate)(&options).unwrap().patch);
        }

        let deps: Vec<_> = patch.dependencies.keys().map(String::as_str).collect();
        assert_eq!(deps, vec!["@prisma/client", "bcryptjs", "jsonwebtoken"]);
        let dev: Vec<_> = patch.dev_dependencies.keys().map(String::as_str).collect();
        assert_eq!(
            dev,
            vec!["@types/bcryptjs", "@types/jsonwebtoken", "prisma"]
        );
    }

    #[test]
    fn merged_manifest_keeps_base_entries() {
        let mut manifest = Manifest::default_for("api");
        manifest.dependencies.insert("express".into(), "^4.21.2".into());
        manifest.scripts.insert("dev".into(), "nodemon".into());

        let options = OptionRecord::builder().testing(true).build().unwrap();
        let output = features::apply(FeatureKind::Testing, &options).unwrap();
        manifest.merge(&output.patch);

        assert_eq!(manifest.dependencies["express"], "^4.21.2");
        assert_eq!(manifest.scripts["dev"], "nodemon");
        assert_eq!(manifest.scripts["test"], "jest");
    }
}
