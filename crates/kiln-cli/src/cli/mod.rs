//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use kiln_core::domain::{
    DataAccess, DataAccessChoice, DemoKind, Dialect, FeatureKind, MessagingBackend,
    MonitoringTool, PersistenceBackend, RateLimitStore, SchematicKind,
};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "kiln",
    bin_name = "kiln",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f525} Backend service scaffolding",
    long_about = "Kiln generates Express services in TypeScript or JavaScript \
                  and adds optional feature modules to existing projects.",
    after_help = "EXAMPLES:\n\
        \x20 kiln new orders-api --db postgres --auth --tests\n\
        \x20 kiln generate resource invoice -C orders-api\n\
        \x20 kiln add rate-limit --rate-limit-store redis -C orders-api\n\
        \x20 kiln completions bash > /usr/share/bash-completion/completions/kiln",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 kiln new orders-api\n\
            \x20 kiln new notes --lang js --db mongodb --env\n\
            \x20 kiln new shop --db mysql --orm sequelize --auth --roles --docs\n\
            \x20 kiln new events --messaging kafka,nats --monitoring prometheus"
    )]
    New(NewArgs),

    /// Generate a schematic inside an existing project.
    #[command(
        visible_alias = "g",
        about = "Generate a controller, service, route, ... or a whole resource",
        after_help = "EXAMPLES:\n\
            \x20 kiln generate controller user\n\
            \x20 kiln g resource blog-post -C ./api\n\
            \x20 kiln g middleware audit --force"
    )]
    Generate(GenerateArgs),

    /// Add a feature module to an existing project.
    #[command(
        about = "Add a feature module to an existing project",
        after_help = "EXAMPLES:\n\
            \x20 kiln add auth\n\
            \x20 kiln add persistence --db postgres --orm typeorm\n\
            \x20 kiln add messaging --messaging rabbitmq -C ./api"
    )]
    Add(AddArgs),

    /// List feature modules and schematics.
    #[command(
        visible_alias = "ls",
        about = "List feature modules and schematics",
        after_help = "EXAMPLES:\n\
            \x20 kiln list\n\
            \x20 kiln list --format json"
    )]
    List(ListArgs),

    /// Initialise a Kiln configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 kiln init           # platform config directory\n\
            \x20 kiln init --local   # ./kiln.toml\n\
            \x20 kiln init --force   # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 kiln completions bash > ~/.local/share/bash-completion/completions/kiln\n\
            \x20 kiln completions zsh  > ~/.zfunc/_kiln\n\
            \x20 kiln completions fish > ~/.config/fish/completions/kiln.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Kiln configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 kiln config get defaults.dialect\n\
            \x20 kiln config list\n\
            \x20 kiln config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `kiln new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name or path.  A plain name creates `./name`; a path like
    /// `../foo` places the project one level up.
    #[arg(value_name = "NAME", help = "Project name or path")]
    pub name: String,

    /// Source language of the generated project.
    #[arg(
        short = 'l',
        long = "lang",
        value_name = "LANG",
        value_enum,
        help = "Source language [default: ts, or defaults.dialect from config]"
    )]
    pub lang: Option<Lang>,

    #[command(flatten)]
    pub features: FeatureArgs,

    /// Clone the base template from a git repository instead of the
    /// built-in skeleton.
    #[arg(
        long = "template-url",
        value_name = "URL",
        help = "Git repository to use as the base template"
    )]
    pub template_url: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `kiln generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Schematic kind.
    #[arg(
        value_name = "KIND",
        help = "controller, service, middleware, route, model, interface, test or resource"
    )]
    pub kind: SchematicKind,

    /// Free-form name, e.g. `user`, `blog-post`, `OrderItem`.
    #[arg(value_name = "NAME")]
    pub name: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

// ── add ───────────────────────────────────────────────────────────────────────

/// Arguments for `kiln add`.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Feature module to add.
    #[arg(value_name = "FEATURE", help = "Feature module (see `kiln list`)")]
    pub feature: FeatureKind,

    #[command(flatten)]
    pub features: FeatureArgs,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Where `generate` and `add` write, and whether they may overwrite.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Project root.
    #[arg(
        short = 'C',
        long = "dir",
        value_name = "DIR",
        default_value = ".",
        help = "Project root containing package.json"
    )]
    pub dir: PathBuf,

    /// Overwrite files whose content differs.
    #[arg(long = "force", help = "Overwrite existing files")]
    pub force: bool,
}

// ── feature flags (shared by new and add) ─────────────────────────────────────

/// Feature selection flags.
#[derive(Debug, Default, Args)]
pub struct FeatureArgs {
    /// Database backend.
    #[arg(long = "db", value_name = "DB", value_enum, help = "Database backend")]
    pub db: Option<Db>,

    /// Data-access technology; `auto` picks one for the backend.
    #[arg(
        long = "orm",
        value_name = "ORM",
        value_enum,
        default_value = "auto",
        help = "Data-access technology"
    )]
    pub orm: Orm,

    #[arg(long = "auth", help = "JWT authentication")]
    pub auth: bool,

    #[arg(long = "casl", help = "Capability-based authorization (CASL)")]
    pub casl: bool,

    #[arg(long = "roles", help = "Role-checking middleware")]
    pub roles: bool,

    #[arg(long = "example", help = "Example resource")]
    pub example: bool,

    #[arg(long = "tests", help = "Jest + Supertest setup")]
    pub tests: bool,

    #[arg(long = "demo", value_name = "DEMO", value_enum, help = "Demo application")]
    pub demo: Option<Demo>,

    #[arg(long = "env", help = "Emit .env and .env.example")]
    pub env: bool,

    #[arg(
        long = "messaging",
        value_name = "BACKENDS",
        value_enum,
        value_delimiter = ',',
        help = "Messaging backends, comma separated"
    )]
    pub messaging: Vec<Messaging>,

    #[arg(
        long = "monitoring",
        value_name = "TOOLS",
        value_enum,
        value_delimiter = ',',
        help = "Monitoring tools, comma separated"
    )]
    pub monitoring: Vec<Monitoring>,

    #[arg(long = "rate-limit", help = "Request rate limiting")]
    pub rate_limit: bool,

    #[arg(
        long = "rate-limit-store",
        value_name = "STORE",
        value_enum,
        help = "Rate limit counter store, implies --rate-limit [default: memory]"
    )]
    pub rate_limit_store: Option<Store>,

    #[arg(long = "docs", help = "Swagger API documentation")]
    pub docs: bool,

    #[arg(long = "realtime", help = "Socket.IO realtime channels")]
    pub realtime: bool,

    #[arg(long = "microservices", help = "Gateway + service layout with docker-compose")]
    pub microservices: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `kiln list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON object.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `kiln init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `kiln.toml` in the current directory instead of the platform
    /// config directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `kiln completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `kiln config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.dialect`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Source language of a new project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Lang {
    #[value(alias = "typescript")]
    Ts,
    #[value(alias = "javascript")]
    Js,
}

impl From<Lang> for Dialect {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::Ts => Dialect::Typed,
            Lang::Js => Dialect::Untyped,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Db {
    None,
    #[value(alias = "postgresql", alias = "pg")]
    Postgres,
    Mysql,
    Sqlite,
    #[value(alias = "mongo")]
    Mongodb,
}

impl From<Db> for PersistenceBackend {
    fn from(db: Db) -> Self {
        match db {
            Db::None => PersistenceBackend::None,
            Db::Postgres => PersistenceBackend::Postgres,
            Db::Mysql => PersistenceBackend::Mysql,
            Db::Sqlite => PersistenceBackend::Sqlite,
            Db::Mongodb => PersistenceBackend::Mongodb,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Orm {
    #[default]
    Auto,
    Prisma,
    Sequelize,
    Typeorm,
    Mongoose,
    #[value(alias = "native")]
    Driver,
}

impl From<Orm> for DataAccessChoice {
    fn from(orm: Orm) -> Self {
        match orm {
            Orm::Auto => DataAccessChoice::Auto,
            Orm::Prisma => DataAccessChoice::Explicit(DataAccess::Prisma),
            Orm::Sequelize => DataAccessChoice::Explicit(DataAccess::Sequelize),
            Orm::Typeorm => DataAccessChoice::Explicit(DataAccess::TypeOrm),
            Orm::Mongoose => DataAccessChoice::Explicit(DataAccess::Mongoose),
            Orm::Driver => DataAccessChoice::Explicit(DataAccess::Driver),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Demo {
    Weather,
    Todo,
    Blog,
    None,
}

impl From<Demo> for DemoKind {
    fn from(demo: Demo) -> Self {
        match demo {
            Demo::Weather => DemoKind::Weather,
            Demo::Todo => DemoKind::Todo,
            Demo::Blog => DemoKind::Blog,
            Demo::None => DemoKind::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Messaging {
    Kafka,
    #[value(alias = "amqp")]
    Rabbitmq,
    Nats,
}

impl From<Messaging> for MessagingBackend {
    fn from(backend: Messaging) -> Self {
        match backend {
            Messaging::Kafka => MessagingBackend::Kafka,
            Messaging::Rabbitmq => MessagingBackend::RabbitMq,
            Messaging::Nats => MessagingBackend::Nats,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Monitoring {
    Prometheus,
    Sentry,
    #[value(alias = "otel")]
    Opentelemetry,
}

impl From<Monitoring> for MonitoringTool {
    fn from(tool: Monitoring) -> Self {
        match tool {
            Monitoring::Prometheus => MonitoringTool::Prometheus,
            Monitoring::Sentry => MonitoringTool::Sentry,
            Monitoring::Opentelemetry => MonitoringTool::OpenTelemetry,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Store {
    Memory,
    Redis,
}

impl From<Store> for RateLimitStore {
    fn from(store: Store) -> Self {
        match store {
            Store::Memory => RateLimitStore::Memory,
            Store::Redis => RateLimitStore::Redis,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_new_command_with_defaults() {
        let cli = Cli::parse_from(["kiln", "new", "orders-api"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.name, "orders-api");
        assert_eq!(args.lang, None);
        assert_eq!(args.features.orm, Orm::Auto);
        assert!(!args.features.auth);
    }

    #[test]
    fn typescript_alias() {
        let cli = Cli::parse_from(["kiln", "new", "api", "-l", "typescript"]);
        if let Commands::New(args) = cli.command {
            assert_eq!(args.lang, Some(Lang::Ts));
        } else {
            panic!("expected New command");
        }
    }

    #[test]
    fn messaging_is_comma_separated() {
        let cli = Cli::parse_from(["kiln", "new", "api", "--messaging", "kafka,nats"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(
            args.features.messaging,
            vec![Messaging::Kafka, Messaging::Nats]
        );
    }

    #[test]
    fn rate_limit_store_parses_alone() {
        let cli = Cli::parse_from(["kiln", "new", "api", "--rate-limit-store", "redis"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert!(!args.features.rate_limit);
        assert_eq!(args.features.rate_limit_store, Some(Store::Redis));
    }

    #[test]
    fn generate_alias_and_kind_shorthand() {
        let cli = Cli::parse_from(["kiln", "g", "res", "blog-post", "-C", "api", "--force"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.kind, SchematicKind::Resource);
        assert_eq!(args.target.dir, PathBuf::from("api"));
        assert!(args.target.force);
    }

    #[test]
    fn unknown_schematic_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["kiln", "generate", "widget", "x"]).is_err());
    }

    #[test]
    fn add_parses_feature_aliases() {
        let cli = Cli::parse_from(["kiln", "add", "swagger"]);
        let Commands::Add(args) = cli.command else {
            panic!("expected Add command");
        };
        assert_eq!(args.feature, FeatureKind::ApiDocs);
        assert_eq!(args.target.dir, PathBuf::from("."));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["kiln", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn value_enums_map_to_core_types() {
        assert_eq!(Dialect::from(Lang::Js), Dialect::Untyped);
        assert_eq!(PersistenceBackend::from(Db::Mongodb), PersistenceBackend::Mongodb);
        assert_eq!(
            DataAccessChoice::from(Orm::Typeorm),
            DataAccessChoice::Explicit(DataAccess::TypeOrm)
        );
        assert_eq!(MonitoringTool::from(Monitoring::Opentelemetry), MonitoringTool::OpenTelemetry);
    }
}
