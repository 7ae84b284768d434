//! Integration tests for the `kiln` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// `kiln` running in `dir`, isolated from the user's config and log env.
fn kiln(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("kiln").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Kiln"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_new_command_help() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .args(["new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--lang"))
        .stdout(predicate::str::contains("--orm"))
        .stdout(predicate::str::contains("--rate-limit-store"));
}

#[test]
fn test_new_typed_project_with_features() {
    let temp = TempDir::new().unwrap();

    kiln(temp.path())
        .args(["new", "orders-api", "--db", "postgres", "--auth", "--tests", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project 'orders-api' created"));

    let root = temp.path().join("orders-api");
    for file in [
        "tsconfig.json",
        "src/app.ts",
        "prisma/schema.prisma",
        "src/config/database.ts",
        "src/middleware/auth.middleware.ts",
        "jest.config.js",
    ] {
        assert!(root.join(file).is_file(), "missing {file}");
    }

    let manifest = read_json(&root.join("package.json"));
    assert_eq!(manifest["name"], "orders-api");
    assert!(manifest["dependencies"]["@prisma/client"].is_string());
    assert!(manifest["dependencies"]["jsonwebtoken"].is_string());
    assert!(manifest["dependencies"]["express"].is_string());
    assert!(manifest["devDependencies"]["jest"].is_string());
    assert_eq!(manifest["scripts"]["test"], "jest");
}

#[test]
fn test_new_untyped_project() {
    let temp = TempDir::new().unwrap();

    kiln(temp.path())
        .args(["new", "notes", "--lang", "js", "--db", "mongodb", "--env", "-y"])
        .assert()
        .success();

    let root = temp.path().join("notes");
    assert!(!root.join("tsconfig.json").exists());
    assert!(root.join("src/app.js").is_file());
    assert!(root.join(".env.example").is_file());
    let manifest = read_json(&root.join("package.json"));
    assert!(manifest["dependencies"]["mongoose"].is_string());
}

#[test]
fn test_new_project_dry_run() {
    let temp = TempDir::new().unwrap();

    kiln(temp.path())
        .args(["new", "preview", "--docs", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("src/config/swagger.ts"))
        .stdout(predicate::str::contains("swagger-ui-express"));

    assert!(!temp.path().join("preview").exists());
}

#[test]
fn test_new_json_report() {
    let temp = TempDir::new().unwrap();

    let assert = kiln(temp.path())
        .args(["--output-format", "json", "new", "billing", "--roles"])
        .assert()
        .success();

    let report: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["project_name"], "billing");
    assert_eq!(report["dialect"], "typed");
    assert_eq!(report["base_template"], "builtin");
    assert!(report["pass_id"].is_string());
    assert!(report["generated_at"].is_string());
    assert!(
        report["artifacts"]
            .as_array()
            .unwrap()
            .iter()
            .any(|a| a["path"] == "src/middleware/role.middleware.ts")
    );
}

#[test]
fn test_generate_resource_in_project() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path()).args(["new", "shop", "-y"]).assert().success();

    kiln(temp.path())
        .args(["generate", "resource", "blog-post", "-C", "shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("src/controllers/blog-post.controller.ts"));

    let root = temp.path().join("shop");
    assert!(root.join("src/interfaces/blog-post.interface.ts").is_file());
    assert!(root.join("tests/blog-post.test.ts").is_file());

    // Identical output on a re-run is not a conflict.
    kiln(temp.path())
        .args(["g", "resource", "blog-post", "-C", "shop"])
        .assert()
        .success();
}

#[test]
fn test_generate_refuses_to_overwrite_without_force() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path()).args(["new", "shop", "-y"]).assert().success();

    let controller = temp.path().join("shop/src/controllers/user.controller.ts");
    fs::create_dir_all(controller.parent().unwrap()).unwrap();
    fs::write(&controller, "// hand written\n").unwrap();

    kiln(temp.path())
        .args(["generate", "controller", "user", "-C", "shop"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Refusing to overwrite"));
    assert_eq!(fs::read_to_string(&controller).unwrap(), "// hand written\n");

    kiln(temp.path())
        .args(["generate", "controller", "user", "-C", "shop", "--force"])
        .assert()
        .success();
    assert!(fs::read_to_string(&controller).unwrap().contains("UserController"));
}

#[test]
fn test_add_feature_to_project() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .args(["new", "gateway", "--lang", "js", "-y"])
        .assert()
        .success();

    kiln(temp.path())
        .args(["add", "rate-limit", "--rate-limit-store", "redis", "-C", "gateway"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added rate-limit"));

    let root = temp.path().join("gateway");
    assert!(root.join("src/middleware/rate-limit.middleware.js").is_file());
    let manifest = read_json(&root.join("package.json"));
    assert!(manifest["dependencies"]["express-rate-limit"].is_string());
    assert!(manifest["dependencies"]["rate-limit-redis"].is_string());
    // Base entries survive the merge.
    assert!(manifest["dependencies"]["express"].is_string());
}

#[test]
fn test_config_file_sets_default_dialect() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("kiln.toml"),
        "[defaults]\ndialect = \"untyped\"\n",
    )
    .unwrap();

    kiln(temp.path()).args(["new", "legacy", "-y"]).assert().success();
    assert!(temp.path().join("legacy/src/server.js").is_file());
}

#[test]
fn test_env_overrides_config() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .env("KILN__DEFAULTS__DIALECT", "untyped")
        .args(["config", "get", "defaults.dialect"])
        .assert()
        .success()
        .stdout("untyped\n");
}

#[test]
fn test_init_local_writes_defaults() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path()).args(["init", "--local"]).assert().success();

    let written = fs::read_to_string(temp.path().join("kiln.toml")).unwrap();
    assert!(written.contains("[defaults]"));
    assert!(written.contains("dialect = \"typed\""));

    kiln(temp.path())
        .args(["init", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_list_json() {
    let temp = TempDir::new().unwrap();
    let assert = kiln(temp.path())
        .args(["list", "--format", "json"])
        .assert()
        .success();

    let catalog: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(catalog["features"].as_array().unwrap().len(), 14);
    assert_eq!(catalog["features"][0]["name"], "persistence");
    assert_eq!(catalog["schematics"].as_array().unwrap().len(), 8);
}

#[test]
fn test_list_csv() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .args(["ls", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("type,name,detail\n"))
        .stdout(predicate::str::contains("feature,api-docs,"));
}

#[test]
fn test_verbose_flag() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .args(["-v", "new", "traced", "-y"])
        .assert()
        .success()
        .stderr(predicate::str::contains("INFO"));
}

#[test]
fn test_verbose_long_help_lists_levels() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("every file written"))
        .stdout(predicate::str::contains("RUST_LOG"));
}

#[test]
fn test_quiet_flag() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .args(["-q", "new", "silent", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_shell_completions() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kiln"));
}
