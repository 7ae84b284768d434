//! Domain value objects: Dialect, PersistenceBackend, DataAccess, feature
//! selectors, SchematicKind, FeatureKind.
//!
//! # Design
//!
//! These are pure value types: `Copy` with equality-by-value.
//! They hold NO capability logic. Backend/technology compatibility and
//! inference live in `capabilities.rs`; feature behaviour lives in the
//! `features` registry. This file's only job is to define the types, their
//! string representations, and their `FromStr` parsers.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. Register its capabilities (`capabilities.rs` or `features/mod.rs`)

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Dialect ──────────────────────────────────────────────────────────────────

/// Output flavor of every generated source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// TypeScript sources, `tsconfig.json` at the project root.
    Typed,
    /// Plain JavaScript sources.
    Untyped,
}

impl Dialect {
    /// File whose presence at the project root marks a typed project.
    pub const MARKER_FILE: &'static str = "tsconfig.json";

    /// Dialect of a project given whether [`Self::MARKER_FILE`] is present.
    pub const fn from_marker(present: bool) -> Self {
        if present { Self::Typed } else { Self::Untyped }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Typed => "typed",
            Self::Untyped => "untyped",
        }
    }

    /// Source file extension, without the dot.
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Typed => "ts",
            Self::Untyped => "js",
        }
    }

    /// Human label used in summaries.
    pub const fn language_name(&self) -> &'static str {
        match self {
            Self::Typed => "TypeScript",
            Self::Untyped => "JavaScript",
        }
    }

    pub const fn is_typed(&self) -> bool {
        matches!(self, Self::Typed)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "typed" | "ts" | "typescript" => Ok(Self::Typed),
            "untyped" | "js" | "javascript" => Ok(Self::Untyped),
            other => Err(DomainError::InvalidOption(format!(
                "unknown dialect: {other}"
            ))),
        }
    }
}

// ── PersistenceBackend ───────────────────────────────────────────────────────

/// Database the generated service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceBackend {
    None,
    Postgres,
    Mysql,
    Sqlite,
    Mongodb,
}

impl PersistenceBackend {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
            Self::Mongodb => "mongodb",
        }
    }

    pub const fn is_relational(&self) -> bool {
        matches!(self, Self::Postgres | Self::Mysql | Self::Sqlite)
    }

    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for PersistenceBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersistenceBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" => Ok(Self::Mysql),
            "sqlite" => Ok(Self::Sqlite),
            "mongodb" | "mongo" => Ok(Self::Mongodb),
            other => Err(DomainError::InvalidOption(format!(
                "unknown persistence backend: {other}"
            ))),
        }
    }
}

// ── DataAccess ────────────────────────────────────────────────────────────────

/// Concrete data-access technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataAccess {
    Prisma,
    Sequelize,
    TypeOrm,
    Mongoose,
    /// The backend's native driver with no mapping layer.
    Driver,
}

impl DataAccess {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Prisma => "prisma",
            Self::Sequelize => "sequelize",
            Self::TypeOrm => "typeorm",
            Self::Mongoose => "mongoose",
            Self::Driver => "driver",
        }
    }
}

impl fmt::Display for DataAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataAccess {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prisma" => Ok(Self::Prisma),
            "sequelize" => Ok(Self::Sequelize),
            "typeorm" => Ok(Self::TypeOrm),
            "mongoose" => Ok(Self::Mongoose),
            "driver" | "native" => Ok(Self::Driver),
            other => Err(DomainError::InvalidOption(format!(
                "unknown data access technology: {other}"
            ))),
        }
    }
}

/// User-facing data-access selection. `Auto` never survives
/// `OptionRecordBuilder::build()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataAccessChoice {
    #[default]
    Auto,
    Explicit(DataAccess),
}

impl fmt::Display for DataAccessChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Explicit(tech) => tech.fmt(f),
        }
    }
}

impl FromStr for DataAccessChoice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            Ok(Self::Auto)
        } else {
            s.parse().map(Self::Explicit)
        }
    }
}

// ── Feature selectors ─────────────────────────────────────────────────────────

/// Sample application bundled into a new project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoKind {
    Weather,
    Todo,
    Blog,
    #[default]
    None,
}

impl DemoKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Todo => "todo",
            Self::Blog => "blog",
            Self::None => "none",
        }
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DemoKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weather" => Ok(Self::Weather),
            "todo" => Ok(Self::Todo),
            "blog" => Ok(Self::Blog),
            "none" => Ok(Self::None),
            other => Err(DomainError::InvalidOption(format!("unknown demo: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagingBackend {
    Kafka,
    RabbitMq,
    Nats,
}

impl MessagingBackend {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kafka => "kafka",
            Self::RabbitMq => "rabbitmq",
            Self::Nats => "nats",
        }
    }
}

impl fmt::Display for MessagingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessagingBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kafka" => Ok(Self::Kafka),
            "rabbitmq" | "rabbit" | "amqp" => Ok(Self::RabbitMq),
            "nats" => Ok(Self::Nats),
            other => Err(DomainError::InvalidOption(format!(
                "unknown messaging backend: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitoringTool {
    Prometheus,
    Sentry,
    OpenTelemetry,
}

impl MonitoringTool {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Prometheus => "prometheus",
            Self::Sentry => "sentry",
            Self::OpenTelemetry => "opentelemetry",
        }
    }
}

impl fmt::Display for MonitoringTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonitoringTool {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prometheus" | "metrics" => Ok(Self::Prometheus),
            "sentry" => Ok(Self::Sentry),
            "opentelemetry" | "otel" => Ok(Self::OpenTelemetry),
            other => Err(DomainError::InvalidOption(format!(
                "unknown monitoring tool: {other}"
            ))),
        }
    }
}

/// Where the rate limiter keeps its counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitStore {
    /// Per-process memory store.
    #[default]
    Memory,
    /// Redis, shared between instances.
    Redis,
}

impl RateLimitStore {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Redis => "redis",
        }
    }

    pub const fn is_distributed(&self) -> bool {
        matches!(self, Self::Redis)
    }
}

impl fmt::Display for RateLimitStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateLimitStore {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => Err(DomainError::InvalidOption(format!(
                "unknown rate limit store: {other}"
            ))),
        }
    }
}

// ── SchematicKind ─────────────────────────────────────────────────────────────

/// A named category of generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchematicKind {
    Controller,
    Service,
    Middleware,
    Route,
    Model,
    Interface,
    Test,
    /// Composite: fans out into the other kinds.
    Resource,
}

impl SchematicKind {
    pub const ALL: [SchematicKind; 8] = [
        Self::Controller,
        Self::Service,
        Self::Middleware,
        Self::Route,
        Self::Model,
        Self::Interface,
        Self::Test,
        Self::Resource,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Controller => "controller",
            Self::Service => "service",
            Self::Middleware => "middleware",
            Self::Route => "route",
            Self::Model => "model",
            Self::Interface => "interface",
            Self::Test => "test",
            Self::Resource => "resource",
        }
    }

    /// Suffixes recognised on user-supplied names, canonical one first.
    ///
    /// The canonical suffix is what gets appended to the type identifier;
    /// any of them is stripped when deriving the file stem.
    pub const fn role_suffixes(&self) -> &'static [&'static str] {
        match self {
            Self::Controller => &["Controller"],
            Self::Service => &["Service"],
            Self::Middleware => &["Middleware"],
            Self::Route => &["Router", "Routes", "Route"],
            Self::Model => &["Model"],
            Self::Interface => &["Interface"],
            Self::Test => &["Test", "Spec"],
            Self::Resource => &[],
        }
    }

    pub const fn is_composite(&self) -> bool {
        matches!(self, Self::Resource)
    }
}

impl fmt::Display for SchematicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchematicKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "controller" | "co" => Ok(Self::Controller),
            "service" | "s" => Ok(Self::Service),
            "middleware" | "mw" => Ok(Self::Middleware),
            "route" | "routes" | "r" => Ok(Self::Route),
            "model" | "m" => Ok(Self::Model),
            "interface" | "i" => Ok(Self::Interface),
            "test" | "spec" | "t" => Ok(Self::Test),
            "resource" | "res" => Ok(Self::Resource),
            other => Err(DomainError::InvalidSchematic(other.to_string())),
        }
    }
}

// ── FeatureKind ───────────────────────────────────────────────────────────────

/// An optional, independently composable capability.
///
/// Declaration order is the order in which a `new` pass expands features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureKind {
    Persistence,
    Auth,
    Authorization,
    Roles,
    Example,
    Testing,
    Demo,
    Env,
    Messaging,
    Monitoring,
    RateLimit,
    ApiDocs,
    Realtime,
    Microservices,
}

impl FeatureKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Persistence => "persistence",
            Self::Auth => "auth",
            Self::Authorization => "authorization",
            Self::Roles => "roles",
            Self::Example => "example",
            Self::Testing => "testing",
            Self::Demo => "demo",
            Self::Env => "env",
            Self::Messaging => "messaging",
            Self::Monitoring => "monitoring",
            Self::RateLimit => "rate-limit",
            Self::ApiDocs => "api-docs",
            Self::Realtime => "realtime",
            Self::Microservices => "microservices",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "persistence" | "database" | "db" | "orm" => Ok(Self::Persistence),
            "auth" | "jwt" => Ok(Self::Auth),
            "authorization" | "casl" => Ok(Self::Authorization),
            "roles" | "role" => Ok(Self::Roles),
            "example" => Ok(Self::Example),
            "testing" | "tests" | "jest" => Ok(Self::Testing),
            "demo" => Ok(Self::Demo),
            "env" | "dotenv" => Ok(Self::Env),
            "messaging" => Ok(Self::Messaging),
            "monitoring" => Ok(Self::Monitoring),
            "rate-limit" | "ratelimit" | "rate_limit" => Ok(Self::RateLimit),
            "api-docs" | "docs" | "swagger" => Ok(Self::ApiDocs),
            "realtime" | "socket" | "websocket" => Ok(Self::Realtime),
            "microservices" | "services" => Ok(Self::Microservices),
            other => Err(DomainError::UnknownFeature(other.to_string())),
        }
    }
}

// ── ArtifactKind ──────────────────────────────────────────────────────────────

/// What an artifact is, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// One of the concrete schematic kinds.
    Schematic(SchematicKind),
    /// Self-contained feature configuration under `src/config`.
    Config,
    /// Other application source.
    Source,
    /// Environment files.
    Environment,
    /// Container and multi-service layout files.
    Infrastructure,
    /// Documentation and static descriptors.
    Document,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schematic(kind) => kind.fmt(f),
            Self::Config => f.write_str("config"),
            Self::Source => f.write_str("source"),
            Self::Environment => f.write_str("environment"),
            Self::Infrastructure => f.write_str("infrastructure"),
            Self::Document => f.write_str("document"),
        }
    }
}
