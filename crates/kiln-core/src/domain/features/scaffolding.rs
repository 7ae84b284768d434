//! Project-level features: example resource, test tooling, environment files.

use super::{typed_dev, FeatureOutput};
use crate::domain::{
    capabilities,
    entities::{ManifestPatch, OptionRecord},
    error::DomainError,
    rendering::RenderContext,
    schematics,
    value_objects::{
        ArtifactKind, DemoKind, MessagingBackend, MonitoringTool, RateLimitStore, SchematicKind,
    },
};

pub(super) fn generate_example(options: &OptionRecord) -> Result<FeatureOutput, DomainError> {
    Ok(FeatureOutput {
        artifacts: schematics::generate(SchematicKind::Resource, "example", options.dialect())?,
        patch: ManifestPatch::new(),
    })
}

pub(super) fn generate_testing(options: &OptionRecord) -> Result<FeatureOutput, DomainError> {
    let ctx = RenderContext::new(options.dialect());
    let mut output = FeatureOutput::new();

    output.emit("jest.config.js", JEST_CONFIG, &ctx, ArtifactKind::Config)?;
    output.emit(
        "tests/app.test.{{EXT}}",
        APP_TEST,
        &ctx,
        ArtifactKind::Schematic(SchematicKind::Test),
    )?;

    let patch = ManifestPatch::new()
        .dev_dependency("jest", "^29.7.0")
        .dev_dependency("supertest", "^7.0.0")
        .script("test", "jest")
        .script("test:watch", "jest --watch");
    output.patch = typed_dev(
        patch,
        options.dialect(),
        &[
            ("ts-jest", "^29.2.5"),
            ("@types/jest", "^29.5.14"),
            ("@types/supertest", "^6.0.2"),
        ],
    );

    Ok(output)
}

/// One entry of an environment file.
struct EnvKey {
    name: &'static str,
    /// Value written to `.env`.
    value: String,
    /// Value written to `.env.example`; secrets are blanked.
    example: String,
}

impl EnvKey {
    fn plain(name: &'static str, value: &str) -> Self {
        Self {
            name,
            value: value.to_string(),
            example: value.to_string(),
        }
    }

    fn secret(name: &'static str, value: &str) -> Self {
        Self {
            name,
            value: value.to_string(),
            example: String::new(),
        }
    }
}

/// Keys the project needs, derived from the choices alone.
fn env_keys(options: &OptionRecord) -> Vec<(&'static str, Vec<EnvKey>)> {
    let mut groups = vec![(
        "Server",
        vec![
            EnvKey::plain("NODE_ENV", "development"),
            EnvKey::plain("PORT", "3000"),
        ],
    )];

    if let Some(def) = capabilities::find_backend(options.persistence()) {
        groups.push(("Database", vec![EnvKey::plain("DATABASE_URL", def.example_url)]));
    }

    if options.auth() {
        groups.push((
            "Auth",
            vec![
                EnvKey::secret("JWT_SECRET", "change-me"),
                EnvKey::plain("JWT_EXPIRES_IN", "1h"),
            ],
        ));
    }

    let mut messaging = Vec::new();
    for backend in options.messaging() {
        match backend {
            MessagingBackend::Kafka => {
                messaging.push(EnvKey::plain("KAFKA_BROKERS", "localhost:9092"));
                messaging.push(EnvKey::plain("KAFKA_CLIENT_ID", "app"));
            }
            MessagingBackend::RabbitMq => {
                messaging.push(EnvKey::plain("RABBITMQ_URL", "amqp://localhost:5672"));
            }
            MessagingBackend::Nats => {
                messaging.push(EnvKey::plain("NATS_URL", "nats://localhost:4222"));
            }
        }
    }
    if !messaging.is_empty() {
        groups.push(("Messaging", messaging));
    }

    let mut monitoring = Vec::new();
    for tool in options.monitoring() {
        match tool {
            MonitoringTool::Prometheus => {}
            MonitoringTool::Sentry => monitoring.push(EnvKey::secret("SENTRY_DSN", "")),
            MonitoringTool::OpenTelemetry => monitoring.push(EnvKey::plain(
                "OTEL_EXPORTER_OTLP_ENDPOINT",
                "http://localhost:4318/v1/traces",
            )),
        }
    }
    if !monitoring.is_empty() {
        groups.push(("Monitoring", monitoring));
    }

    if let Some(store) = options.rate_limit() {
        let mut keys = vec![
            EnvKey::plain("RATE_LIMIT_WINDOW_MS", "900000"),
            EnvKey::plain("RATE_LIMIT_MAX", "100"),
        ];
        if store == RateLimitStore::Redis {
            keys.push(EnvKey::plain("REDIS_URL", "redis://localhost:6379"));
        }
        groups.push(("Rate limiting", keys));
    }

    if options.realtime() {
        groups.push(("Realtime", vec![EnvKey::plain("SOCKET_CORS_ORIGIN", "*")]));
    }

    if options.microservices() {
        groups.push((
            "Services",
            vec![
                EnvKey::plain("GATEWAY_PORT", "8080"),
                EnvKey::plain("USERS_SERVICE_URL", "http://localhost:3001"),
            ],
        ));
    }

    if options.demo() == DemoKind::Weather {
        groups.push((
            "Weather demo",
            vec![EnvKey::plain(
                "WEATHER_API_URL",
                "https://api.open-meteo.com/v1/forecast",
            )],
        ));
    }

    groups
}

fn render_env(groups: &[(&str, Vec<EnvKey>)], example: bool) -> String {
    let mut out = String::new();
    for (index, (title, keys)) in groups.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str("# ");
        out.push_str(title);
        out.push('\n');
        for key in keys {
            let value = if example { &key.example } else { &key.value };
            out.push_str(key.name);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
    }
    out
}

pub(super) fn generate_env(options: &OptionRecord) -> Result<FeatureOutput, DomainError> {
    let groups = env_keys(options);
    let mut output = FeatureOutput::new();

    output.emit_raw(
        ".env",
        render_env(&groups, false),
        ArtifactKind::Environment,
        options.dialect(),
    )?;
    output.emit_raw(
        ".env.example",
        render_env(&groups, true),
        ArtifactKind::Environment,
        options.dialect(),
    )?;
    output.patch = ManifestPatch::new().dependency("dotenv", "^16.4.7");

    Ok(output)
}

const JEST_CONFIG: &str = r#"/** @type {import('jest').Config} */
module.exports = {
{{#typed}}
  preset: 'ts-jest',
{{/typed}}
  testEnvironment: 'node',
  roots: ['<rootDir>/tests'],
};
"#;

const APP_TEST: &str = r#"{{#typed}}
import request from 'supertest';
import app from '../src/app';
{{/typed}}
{{#untyped}}
const request = require('supertest');
const app = require('../src/app');
{{/untyped}}

describe('app', () => {
  it('answers the health check', async () => {
    const res = await request(app).get('/health');
    expect(res.status).toBe(200);
    expect(res.body.status).toBe('ok');
  });
});
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Dialect, PersistenceBackend};

    #[test]
    fn example_is_a_resource_fan_out() {
        let options = OptionRecord::builder().example(true).build().unwrap();
        let output = generate_example(&options).unwrap();
        assert_eq!(output.artifacts.len(), 6);
        assert!(output
            .artifacts
            .paths()
            .contains(&"src/controllers/example.controller.ts"));
    }

    #[test]
    fn testing_adds_ts_jest_only_when_typed() {
        let typed = OptionRecord::builder().testing(true).build().unwrap();
        let output = generate_testing(&typed).unwrap();
        assert!(output.patch.dev_dependencies.contains_key("ts-jest"));
        assert_eq!(output.patch.scripts["test"], "jest");
        assert!(output
            .artifacts
            .iter()
            .next()
            .unwrap()
            .content()
            .contains("preset: 'ts-jest'"));

        let untyped = typed.with_dialect(Dialect::Untyped);
        let output = generate_testing(&untyped).unwrap();
        assert!(!output.patch.dev_dependencies.contains_key("ts-jest"));
        assert_eq!(output.artifacts.paths(), vec!["jest.config.js", "tests/app.test.js"]);
    }

    #[test]
    fn env_keys_follow_the_options() {
        let options = OptionRecord::builder()
            .env_file(true)
            .persistence(PersistenceBackend::Postgres)
            .auth(true)
            .rate_limit(Some(RateLimitStore::Redis))
            .build()
            .unwrap();
        let output = generate_env(&options).unwrap();
        let env = output.artifacts.iter().next().unwrap().content();

        assert!(env.starts_with("# Server\nNODE_ENV=development\nPORT=3000\n"));
        assert!(env.contains("DATABASE_URL=postgresql://"));
        assert!(env.contains("JWT_SECRET=change-me"));
        assert!(env.contains("REDIS_URL=redis://localhost:6379"));
        assert!(!env.contains("KAFKA"));
    }

    #[test]
    fn example_env_blanks_secrets() {
        let options = OptionRecord::builder().env_file(true).auth(true).build().unwrap();
        let output = generate_env(&options).unwrap();
        let example = output.artifacts.iter().nth(1).unwrap();
        assert_eq!(example.path().as_str(), ".env.example");
        assert!(example.content().contains("JWT_SECRET=\n"));
        assert!(example.content().contains("JWT_EXPIRES_IN=1h\n"));
    }

    #[test]
    fn bare_env_has_only_server_keys() {
        let options = OptionRecord::builder().env_file(true).build().unwrap();
        let output = generate_env(&options).unwrap();
        assert_eq!(
            output.artifacts.iter().next().unwrap().content(),
            "# Server\nNODE_ENV=development\nPORT=3000\n"
        );
        assert_eq!(output.patch.dependencies["dotenv"], "^16.4.7");
    }
}
