//! Feature module registry.
//!
//! Every optional capability is described once by a [`FeatureDef`] in
//! [`FEATURE_REGISTRY`]. A feature generator:
//!
//! - reads only the [`OptionRecord`]
//! - never sees another feature's output
//! - makes no assumption about which features run before or after it
//!
//! Cross-feature wiring is left to the user as `kiln:wire` comments in the
//! generated code.
//!
//! # Adding a New Feature
//!
//! 1. Add a variant to `FeatureKind` in `value_objects.rs`
//! 2. Write its generator in a submodule
//! 3. Add one [`FeatureDef`] entry to [`FEATURE_REGISTRY`], keeping the
//!    `FeatureKind` declaration order

mod api_docs;
mod auth;
mod demo;
mod messaging;
mod microservices;
mod monitoring;
mod persistence;
mod rate_limit;
mod realtime;
mod scaffolding;

use crate::domain::{
    entities::{Artifact, ArtifactSet, ManifestPatch, OptionRecord},
    error::DomainError,
    rendering::RenderContext,
    value_objects::{ArtifactKind, Dialect, FeatureKind},
};

/// Artifacts and manifest entries produced by one feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureOutput {
    pub artifacts: ArtifactSet,
    pub patch: ManifestPatch,
}

impl FeatureOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `template` (and `path`) with `ctx` and record the artifact.
    pub(crate) fn emit(
        &mut self,
        path: &str,
        template: &str,
        ctx: &RenderContext,
        kind: ArtifactKind,
    ) -> Result<(), DomainError> {
        let artifact = Artifact::new(&ctx.render(path), ctx.render(template), kind, ctx.dialect())?;
        self.artifacts.push(artifact)
    }

    /// Record an artifact whose content is already final.
    pub(crate) fn emit_raw(
        &mut self,
        path: &str,
        content: String,
        kind: ArtifactKind,
        dialect: Dialect,
    ) -> Result<(), DomainError> {
        self.artifacts.push(Artifact::new(path, content, kind, dialect)?)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureDef {
    pub kind: FeatureKind,

    /// One line for `kiln list`.
    pub summary: &'static str,

    /// Which flag enables the feature, for `FeatureNotConfigured`.
    pub enabled_by: &'static str,

    pub is_enabled: fn(&OptionRecord) -> bool,

    pub generate: fn(&OptionRecord) -> Result<FeatureOutput, DomainError>,
}

/// All feature modules, in expansion order.
pub static FEATURE_REGISTRY: &[FeatureDef] = &[
    FeatureDef {
        kind: FeatureKind::Persistence,
        summary: "Database connection and data-access wiring",
        enabled_by: "--db <backend>",
        is_enabled: |o| !o.persistence().is_none(),
        generate: persistence::generate,
    },
    FeatureDef {
        kind: FeatureKind::Auth,
        summary: "JWT token issuing and verification middleware",
        enabled_by: "--auth",
        is_enabled: |o| o.auth(),
        generate: auth::generate_auth,
    },
    FeatureDef {
        kind: FeatureKind::Authorization,
        summary: "CASL ability definitions and authorize middleware",
        enabled_by: "--casl",
        is_enabled: |o| o.authorization(),
        generate: auth::generate_authorization,
    },
    FeatureDef {
        kind: FeatureKind::Roles,
        summary: "Role-checking middleware",
        enabled_by: "--roles",
        is_enabled: |o| o.roles(),
        generate: auth::generate_roles,
    },
    FeatureDef {
        kind: FeatureKind::Example,
        summary: "Example resource (controller, service, route, model, test)",
        enabled_by: "--example",
        is_enabled: |o| o.example(),
        generate: scaffolding::generate_example,
    },
    FeatureDef {
        kind: FeatureKind::Testing,
        summary: "Jest and supertest setup",
        enabled_by: "--tests",
        is_enabled: |o| o.testing(),
        generate: scaffolding::generate_testing,
    },
    FeatureDef {
        kind: FeatureKind::Demo,
        summary: "Demo application (weather, todo, blog)",
        enabled_by: "--demo <kind>",
        is_enabled: |o| o.demo() != crate::domain::value_objects::DemoKind::None,
        generate: demo::generate,
    },
    FeatureDef {
        kind: FeatureKind::Env,
        summary: ".env and .env.example with the keys the project needs",
        enabled_by: "--env",
        is_enabled: |o| o.env_file(),
        generate: scaffolding::generate_env,
    },
    FeatureDef {
        kind: FeatureKind::Messaging,
        summary: "Kafka, RabbitMQ or NATS clients",
        enabled_by: "--messaging <backends>",
        is_enabled: |o| !o.messaging().is_empty(),
        generate: messaging::generate,
    },
    FeatureDef {
        kind: FeatureKind::Monitoring,
        summary: "Prometheus, Sentry or OpenTelemetry setup",
        enabled_by: "--monitoring <tools>",
        is_enabled: |o| !o.monitoring().is_empty(),
        generate: monitoring::generate,
    },
    FeatureDef {
        kind: FeatureKind::RateLimit,
        summary: "Request rate limiting (memory or redis store)",
        enabled_by: "--rate-limit",
        is_enabled: |o| o.rate_limit().is_some(),
        generate: rate_limit::generate,
    },
    FeatureDef {
        kind: FeatureKind::ApiDocs,
        summary: "Swagger UI and OpenAPI spec generation",
        enabled_by: "--docs",
        is_enabled: |o| o.api_docs(),
        generate: api_docs::generate,
    },
    FeatureDef {
        kind: FeatureKind::Realtime,
        summary: "socket.io server and event handlers",
        enabled_by: "--realtime",
        is_enabled: |o| o.realtime(),
        generate: realtime::generate,
    },
    FeatureDef {
        kind: FeatureKind::Microservices,
        summary: "Gateway and service layout with docker-compose",
        enabled_by: "--microservices",
        is_enabled: |o| o.microservices(),
        generate: microservices::generate,
    },
];

pub fn find(kind: FeatureKind) -> Option<&'static FeatureDef> {
    FEATURE_REGISTRY.iter().find(|def| def.kind == kind)
}

/// Features switched on by `options`, in registry order.
pub fn enabled(options: &OptionRecord) -> impl Iterator<Item = &'static FeatureDef> + '_ {
    FEATURE_REGISTRY
        .iter()
        .filter(move |def| (def.is_enabled)(options))
}

/// Run one feature generator, refusing features `options` does not enable.
pub fn apply(kind: FeatureKind, options: &OptionRecord) -> Result<FeatureOutput, DomainError> {
    let def = find(kind).ok_or_else(|| DomainError::UnknownFeature(kind.to_string()))?;
    if !(def.is_enabled)(options) {
        return Err(DomainError::FeatureNotConfigured {
            feature: kind.to_string(),
            reason: format!("enable it with {}", def.enabled_by),
        });
    }
    (def.generate)(options)
}

/// Shared dev dependencies a typed project needs for a package's typings.
pub(crate) fn typed_dev(
    patch: ManifestPatch,
    dialect: Dialect,
    packages: &[(&str, &str)],
) -> ManifestPatch {
    if !dialect.is_typed() {
        return patch;
    }
    packages
        .iter()
        .fold(patch, |patch, (name, version)| patch.dev_dependency(name, version))
}
