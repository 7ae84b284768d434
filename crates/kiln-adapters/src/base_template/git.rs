//! Base template fetched with `git clone --depth 1`.
//!
//! The repository is cloned into a temporary directory and read back as
//! artifacts, so the project itself is only ever written through the
//! `Filesystem` port. `.git` is never copied.
//!
//! The checkout decides its own dialect: every file is stamped typed when
//! `tsconfig.json` sits at the template root and untyped otherwise. Template
//! files must be UTF-8 text; anything else fails the acquisition.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use kiln_core::{
    application::{ApplicationError, ports::BaseTemplateSource},
    domain::{Artifact, ArtifactKind, Dialect, MANIFEST_FILE, OptionRecord},
    error::{KilnError, KilnResult},
};

#[derive(Debug, Clone)]
pub struct GitTemplate {
    url: String,
}

impl GitTemplate {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn failed(&self, reason: impl Into<String>) -> KilnError {
        ApplicationError::BaseTemplateFailed {
            source_name: self.name(),
            reason: reason.into(),
        }
        .into()
    }

    fn clone_into(&self, dir: &Path) -> KilnResult<()> {
        let output = Command::new("git")
            .args(["clone", "--depth", "1", "--quiet"])
            .arg(&self.url)
            .arg(dir)
            .output()
            .map_err(|e| self.failed(format!("could not run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failed(stderr.trim().to_string()));
        }
        Ok(())
    }
}

impl BaseTemplateSource for GitTemplate {
    fn name(&self) -> String {
        format!("git:{}", self.url)
    }

    #[instrument(skip_all, fields(url = %self.url))]
    fn acquire(&self, _project_name: &str, options: &OptionRecord) -> KilnResult<Vec<Artifact>> {
        let temp = tempfile::tempdir().map_err(|e| self.failed(e.to_string()))?;
        let checkout = temp.path().join("template");

        self.clone_into(&checkout)?;
        let (dialect, artifacts) =
            collect_artifacts(&checkout).map_err(|reason| self.failed(reason))?;

        info!(
            files = artifacts.len(),
            %dialect,
            requested = %options.dialect(),
            "base template cloned"
        );
        Ok(artifacts)
    }
}

/// Read every file below `dir` except the `.git` directory, stamped with the
/// dialect the checkout's marker file announces.
fn collect_artifacts(dir: &Path) -> Result<(Dialect, Vec<Artifact>), String> {
    let dialect = Dialect::from_marker(dir.join(Dialect::MARKER_FILE).is_file());
    let mut artifacts = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != OsStr::new(".git"));

    for entry in walker {
        let entry = entry.map_err(|e| format!("directory walk error: {e}"))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(dir).map_err(|e| e.to_string())?;
        let content = fs::read_to_string(entry.path())
            .map_err(|e| format!("{} is not a UTF-8 text file: {e}", relative.display()))?;

        let kind = classify(relative);
        let path = relative.to_string_lossy().replace('\\', "/");
        let artifact = Artifact::new(&path, content, kind, dialect).map_err(|e| e.to_string())?;
        debug!(path = %artifact.path(), "template file");
        artifacts.push(artifact);
    }

    Ok((dialect, artifacts))
}

fn classify(path: &Path) -> ArtifactKind {
    let name = path.file_name().and_then(OsStr::to_str).unwrap_or_default();
    match path.extension().and_then(OsStr::to_str) {
        _ if name == MANIFEST_FILE || name == Dialect::MARKER_FILE => ArtifactKind::Config,
        Some("md") => ArtifactKind::Document,
        Some("yml" | "yaml") => ArtifactKind::Infrastructure,
        _ if name.starts_with(".env") => ArtifactKind::Environment,
        _ => ArtifactKind::Source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &[u8]) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn collects_files_and_skips_git_dir() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), ".git/HEAD", b"ref: refs/heads/main\n");
        write(temp.path(), "package.json", b"{}");
        write(temp.path(), "src/app.js", b"module.exports = {};\n");
        write(temp.path(), "README.md", b"# starter\n");

        let (dialect, artifacts) = collect_artifacts(temp.path()).unwrap();
        let paths: Vec<_> = artifacts.iter().map(|a| a.path().as_str()).collect();

        assert_eq!(dialect, Dialect::Untyped);
        assert_eq!(paths, vec!["README.md", "package.json", "src/app.js"]);
        assert_eq!(artifacts[1].kind(), ArtifactKind::Config);
        assert!(artifacts.iter().all(|a| a.dialect() == Dialect::Untyped));
    }

    #[test]
    fn marker_file_makes_checkout_typed() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "package.json", b"{}");
        write(temp.path(), "tsconfig.json", b"{}");
        write(temp.path(), "src/app.ts", b"export {};\n");

        let (dialect, artifacts) = collect_artifacts(temp.path()).unwrap();

        assert_eq!(dialect, Dialect::Typed);
        assert!(artifacts.iter().all(|a| a.dialect() == Dialect::Typed));
    }

    #[test]
    fn nested_marker_does_not_count() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "package.json", b"{}");
        write(temp.path(), "tools/tsconfig.json", b"{}");

        let (dialect, _) = collect_artifacts(temp.path()).unwrap();
        assert_eq!(dialect, Dialect::Untyped);
    }

    #[test]
    fn binary_files_fail_the_template() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "logo.png", &[0x89, 0x50, 0xff, 0xfe]);
        write(temp.path(), "index.js", b"");

        let reason = collect_artifacts(temp.path()).unwrap_err();
        assert!(reason.contains("logo.png"), "{reason}");
        assert!(reason.contains("not a UTF-8 text file"));
    }

    #[test]
    fn unreachable_repository_is_base_template_failure() {
        let temp = TempDir::new().unwrap();
        let source = GitTemplate::new(temp.path().join("missing").display().to_string());

        let err = source
            .acquire("api", &OptionRecord::default())
            .unwrap_err();

        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::BaseTemplateFailed { .. })
        ));
    }

    #[test]
    fn classifies_by_name() {
        assert_eq!(classify(Path::new("tsconfig.json")), ArtifactKind::Config);
        assert_eq!(classify(Path::new("docker-compose.yml")), ArtifactKind::Infrastructure);
        assert_eq!(classify(Path::new(".env.example")), ArtifactKind::Environment);
        assert_eq!(classify(Path::new("src/app.ts")), ArtifactKind::Source);
    }
}
