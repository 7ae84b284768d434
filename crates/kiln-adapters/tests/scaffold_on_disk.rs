//! `new`, `generate` and `add` against a real directory.

use std::fs;
use std::sync::Arc;

use kiln_adapters::{BuiltinTemplate, LocalFilesystem, MemoryFilesystem};
use kiln_core::prelude::*;

#[test]
fn untyped_project_on_disk() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("notes-api");
    let fs = Arc::new(LocalFilesystem::new());

    let options = OptionRecord::builder()
        .dialect(Dialect::Untyped)
        .persistence(PersistenceBackend::Mongodb)
        .testing(true)
        .env_file(true)
        .build()
        .unwrap();

    let report = ScaffoldService::new(fs.clone(), Arc::new(BuiltinTemplate::new()))
        .scaffold("notes-api", &root, &options)
        .unwrap();

    assert_eq!(report.data_access, Some(DataAccess::Mongoose));
    assert!(!root.join("tsconfig.json").exists());
    assert!(root.join("src/config/database.js").is_file());
    assert!(root.join(".env.example").is_file());

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("package.json")).unwrap()).unwrap();
    assert_eq!(manifest["name"], "notes-api");
    assert!(manifest["dependencies"]["mongoose"].is_string());
    assert!(manifest["dependencies"]["dotenv"].is_string());
    assert_eq!(manifest["scripts"]["start"], "node src/server.js");

    SchematicService::new(fs.clone())
        .generate(SchematicKind::Resource, "note", &root, WritePolicy::FailIfExists)
        .unwrap();
    assert!(root.join("src/routes/note.routes.js").is_file());
    assert!(!root.join("src/interfaces").exists());
}

#[test]
fn typed_project_in_memory() {
    let fs = Arc::new(MemoryFilesystem::new());
    let root = std::path::Path::new("/work/catalog");
    let options = OptionRecord::builder().api_docs(true).build().unwrap();

    ScaffoldService::new(fs.clone(), Arc::new(BuiltinTemplate::new()))
        .scaffold("catalog", root, &options)
        .unwrap();

    assert!(fs.read_file(&root.join("tsconfig.json")).is_some());
    assert!(fs.read_file(&root.join("src/config/swagger.ts")).is_some());

    let added = FeatureService::new(fs.clone())
        .apply_feature(
            FeatureKind::Roles,
            root,
            &OptionRecord::builder().roles(true).build().unwrap(),
            WritePolicy::FailIfExists,
        )
        .unwrap();
    assert_eq!(added.artifacts[0].path, "src/middleware/role.middleware.ts");
}
