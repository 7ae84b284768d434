//! Integration tests for kiln-core through its public API.

use std::path::Path;
use std::sync::Arc;

use kiln_adapters::MemoryFilesystem;
use kiln_core::{
    application::{ApplicationError, FeatureService, SchematicService, WriteOutcome},
    domain::{ArtifactKind, FEATURE_REGISTRY, OptionRecordBuilder, features},
    prelude::*,
};

const ROOT: &str = "/work/inventory";

struct Skeleton;

impl BaseTemplateSource for Skeleton {
    fn name(&self) -> String {
        "skeleton".into()
    }

    fn acquire(&self, project_name: &str, options: &OptionRecord) -> KilnResult<Vec<Artifact>> {
        let dialect = options.dialect();
        let mut files = vec![Artifact::new(
            "package.json",
            format!(r#"{{"name":"{project_name}","dependencies":{{"express":"^4.21.2"}}}}"#),
            ArtifactKind::Config,
            dialect,
        )?];
        if dialect.is_typed() {
            files.push(Artifact::new(
                "tsconfig.json",
                "{}\n",
                ArtifactKind::Config,
                dialect,
            )?);
        }
        Ok(files)
    }
}

/// Turn on `kind` with the settings [`everything`] uses for it.
fn enable(builder: OptionRecordBuilder, kind: FeatureKind) -> OptionRecordBuilder {
    match kind {
        FeatureKind::Persistence => builder
            .persistence(PersistenceBackend::Postgres)
            .data_access(DataAccessChoice::Explicit(DataAccess::Sequelize)),
        FeatureKind::Auth => builder.auth(true),
        FeatureKind::Authorization => builder.authorization(true),
        FeatureKind::Roles => builder.roles(true),
        FeatureKind::Example => builder.example(true),
        FeatureKind::Testing => builder.testing(true),
        FeatureKind::Demo => builder.demo(DemoKind::Weather),
        FeatureKind::Env => builder.env_file(true),
        FeatureKind::Messaging => {
            builder.messaging([MessagingBackend::Kafka, MessagingBackend::Nats])
        }
        FeatureKind::Monitoring => builder.monitoring([MonitoringTool::Prometheus]),
        FeatureKind::RateLimit => builder.rate_limit(Some(RateLimitStore::Redis)),
        FeatureKind::ApiDocs => builder.api_docs(true),
        FeatureKind::Realtime => builder.realtime(true),
        FeatureKind::Microservices => builder.microservices(true),
    }
}

fn everything(dialect: Dialect) -> OptionRecord {
    FEATURE_REGISTRY
        .iter()
        .fold(OptionRecord::builder().dialect(dialect), |b, def| enable(b, def.kind))
        .build()
        .unwrap()
}

fn only(kind: FeatureKind, dialect: Dialect) -> OptionRecord {
    enable(OptionRecord::builder().dialect(dialect), kind)
        .build()
        .unwrap()
}

fn scaffold(options: &OptionRecord) -> (MemoryFilesystem, ScaffoldReport) {
    let fs = MemoryFilesystem::new();
    let service = ScaffoldService::new(Arc::new(fs.clone()), Arc::new(Skeleton));
    let report = service
        .scaffold("inventory", Path::new(ROOT), options)
        .unwrap();
    (fs, report)
}

fn read(fs: &MemoryFilesystem, relative: &str) -> Option<String> {
    fs.read_file(&Path::new(ROOT).join(relative))
}

#[test]
fn every_feature_in_both_dialects() {
    for dialect in [Dialect::Typed, Dialect::Untyped] {
        let (fs, report) = scaffold(&everything(dialect));

        assert_eq!(report.features.len(), 14);
        assert!(report.artifacts.iter().all(|a| a.dialect == dialect));

        let manifest: serde_json::Value =
            serde_json::from_str(&read(&fs, "package.json").unwrap()).unwrap();
        assert_eq!(manifest["dependencies"]["express"], "^4.21.2");
        assert!(manifest["dependencies"]["sequelize"].is_string());
        assert!(manifest["dependencies"]["kafkajs"].is_string());
        assert!(manifest["devDependencies"]["jest"].is_string());
    }
}

#[test]
fn identical_options_give_identical_trees() {
    let options = everything(Dialect::Typed);
    let (first, a) = scaffold(&options);
    let (second, b) = scaffold(&options);

    assert_eq!(first.snapshot(Path::new(ROOT)), second.snapshot(Path::new(ROOT)));
    assert_ne!(a.pass_id, b.pass_id);
}

/// Each feature writes the same files and manifest entries inside a full
/// scaffold as it does alone. The env feature is left out because its
/// `.env.example` lists variables for the other enabled features.
#[test]
fn features_render_the_same_alone_and_together() {
    for dialect in [Dialect::Typed, Dialect::Untyped] {
        let (fs, _) = scaffold(&everything(dialect));
        let manifest: serde_json::Value =
            serde_json::from_str(&read(&fs, "package.json").unwrap()).unwrap();

        let kinds = FEATURE_REGISTRY.iter().map(|def| def.kind);
        for kind in kinds.filter(|&kind| kind != FeatureKind::Env) {
            let alone = features::apply(kind, &only(kind, dialect)).unwrap();

            for artifact in alone.artifacts.iter() {
                assert_eq!(
                    read(&fs, artifact.path().as_str()).as_deref(),
                    Some(artifact.content()),
                    "{kind} wrote a different {} in the full scaffold",
                    artifact.path()
                );
            }
            for (section, entries) in [
                ("dependencies", &alone.patch.dependencies),
                ("devDependencies", &alone.patch.dev_dependencies),
                ("scripts", &alone.patch.scripts),
            ] {
                for (name, value) in entries {
                    assert_eq!(
                        manifest[section][name].as_str(),
                        Some(value.as_str()),
                        "{kind}: {section}.{name}"
                    );
                }
            }
        }
    }
}

#[test]
fn generate_then_add_on_scaffolded_project() {
    let (fs, _) = scaffold(&OptionRecord::default());
    let root = Path::new(ROOT);

    let schematics = SchematicService::new(Arc::new(fs.clone()));
    let written = schematics
        .generate(SchematicKind::Resource, "order item", root, WritePolicy::FailIfExists)
        .unwrap();
    assert_eq!(written.len(), 6);
    assert!(read(&fs, "src/controllers/order-item.controller.ts")
        .unwrap()
        .contains("OrderItemController"));

    let features = FeatureService::new(Arc::new(fs.clone()));
    let options = OptionRecord::builder().realtime(true).build().unwrap();
    let first = features
        .apply_feature(FeatureKind::Realtime, root, &options, WritePolicy::FailIfExists)
        .unwrap();
    assert!(first.artifacts.iter().all(|a| a.outcome == WriteOutcome::Created));

    let again = features
        .apply_feature(FeatureKind::Realtime, root, &options, WritePolicy::FailIfExists)
        .unwrap();
    assert!(again.artifacts.iter().all(|a| a.outcome == WriteOutcome::Unchanged));

    let manifest = read(&fs, "package.json").unwrap();
    assert!(manifest.contains("\"socket.io\""));
}

#[test]
fn scaffolding_twice_is_rejected() {
    let fs = MemoryFilesystem::new();
    let service = ScaffoldService::new(Arc::new(fs.clone()), Arc::new(Skeleton));
    let root = Path::new(ROOT);
    service
        .scaffold("inventory", root, &OptionRecord::default())
        .unwrap();
    let before = fs.snapshot(root);

    let err = service
        .scaffold("inventory", root, &OptionRecord::default())
        .unwrap_err();

    assert!(matches!(
        err,
        KilnError::Application(ApplicationError::ProjectExists { .. })
    ));
    assert_eq!(before, fs.snapshot(root));
}
