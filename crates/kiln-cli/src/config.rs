//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `KILN__*` environment variables (`KILN__DEFAULTS__DIALECT=untyped`)
//! 3. `./kiln.toml`
//! 4. The user config file (`--config`, or the platform config directory)
//! 5. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use kiln_core::domain::{Dialect, PersistenceBackend};

/// File name used by `kiln init --local`.
pub const LOCAL_CONFIG_FILE: &str = "kiln.toml";

const ENV_PREFIX: &str = "KILN";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default values for new projects.
    #[serde(default)]
    pub defaults: Defaults,
    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Base template settings.
    #[serde(default)]
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub dialect: Dialect,
    pub persistence: PersistenceBackend,
    pub tests: bool,
    pub env_file: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            dialect: Dialect::Typed,
            persistence: PersistenceBackend::None,
            tests: false,
            env_file: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`; used when `--output-format` is
    /// left at `auto`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Git repository cloned as the base template of every `new` pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
}

impl AppConfig {
    /// Load configuration from defaults, files and the environment.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist. Without it the platform config file is read when present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let user_file = match config_file {
            Some(path) => File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(true),
            None => File::from(Self::config_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        Self::load_from(user_file, Path::new(LOCAL_CONFIG_FILE))
    }

    fn load_from(
        user_file: File<config::FileSourceFile, FileFormat>,
        local_file: &Path,
    ) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode default configuration")?;

        Config::builder()
            .add_source(defaults)
            .add_source(user_file)
            .add_source(File::from(local_file).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `kiln.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "kiln", "kiln")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Serialise as TOML, the format `kiln init` writes.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialise configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn load_file(path: &Path) -> AppConfig {
        let missing_local = path.with_file_name("absent.toml");
        AppConfig::load_from(
            File::from(path).format(FileFormat::Toml).required(true),
            &missing_local,
        )
        .unwrap()
    }

    #[test]
    fn default_dialect_is_typed() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.dialect, Dialect::Typed);
        assert_eq!(cfg.defaults.persistence, PersistenceBackend::None);
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[defaults]\ndialect = \"untyped\"\npersistence = \"mongodb\"\ntests = true\n\n\
             [templates]\nrepository_url = \"https://example.com/starter.git\"\n",
        )
        .unwrap();

        let cfg = load_file(&path);
        assert_eq!(cfg.defaults.dialect, Dialect::Untyped);
        assert_eq!(cfg.defaults.persistence, PersistenceBackend::Mongodb);
        assert!(cfg.defaults.tests);
        assert!(!cfg.defaults.env_file);
        assert_eq!(cfg.output.format, "auto");
        assert_eq!(
            cfg.templates.repository_url.as_deref(),
            Some("https://example.com/starter.git")
        );
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn invalid_dialect_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[defaults]\ndialect = \"cobol\"\n").unwrap();

        let result = AppConfig::load_from(
            File::from(path.as_path()).format(FileFormat::Toml).required(true),
            &dir.path().join("absent.toml"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn toml_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, AppConfig::default().to_toml().unwrap()).unwrap();

        assert_eq!(load_file(&path), AppConfig::default());
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
