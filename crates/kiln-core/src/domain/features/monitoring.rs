//! Metrics, error tracking and tracing setup.

use super::FeatureOutput;
use crate::domain::{
    entities::{ManifestPatch, OptionRecord},
    error::DomainError,
    rendering::RenderContext,
    value_objects::{ArtifactKind, FeatureKind, MonitoringTool},
};

const OTEL_VERSION: &str = "^0.55.0";

pub(super) fn generate(options: &OptionRecord) -> Result<FeatureOutput, DomainError> {
    if options.monitoring().is_empty() {
        return Err(DomainError::FeatureNotConfigured {
            feature: FeatureKind::Monitoring.to_string(),
            reason: "no monitoring tool selected".into(),
        });
    }

    let mut output = FeatureOutput::new();
    let mut patch = ManifestPatch::new();

    for tool in options.monitoring() {
        let ctx = RenderContext::new(options.dialect()).with_variable("TOOL", tool.as_str());
        let template = match tool {
            MonitoringTool::Prometheus => PROMETHEUS,
            MonitoringTool::Sentry => SENTRY,
            MonitoringTool::OpenTelemetry => OPENTELEMETRY,
        };
        output.emit("src/config/{{TOOL}}.{{EXT}}", template, &ctx, ArtifactKind::Config)?;

        patch = match tool {
            MonitoringTool::Prometheus => patch.dependency("prom-client", "^15.1.3"),
            MonitoringTool::Sentry => patch.dependency("@sentry/node", "^8.42.0"),
            MonitoringTool::OpenTelemetry => patch
                .dependency("@opentelemetry/sdk-node", OTEL_VERSION)
                .dependency("@opentelemetry/auto-instrumentations-node", "^0.53.0")
                .dependency("@opentelemetry/exporter-trace-otlp-http", OTEL_VERSION),
        };
    }

    output.patch = patch;
    Ok(output)
}

const PROMETHEUS: &str = r#"{{#typed}}
import { Request, Response } from 'express';
import client from 'prom-client';
{{/typed}}
{{#untyped}}
const client = require('prom-client');
{{/untyped}}

client.collectDefaultMetrics();

{{#typed}}export {{/typed}}const httpRequestDuration = new client.Histogram({
  name: 'http_request_duration_seconds',
  help: 'Duration of HTTP requests in seconds',
  labelNames: ['method', 'route', 'status'],
});

// kiln:wire expose with app.get('/metrics', metricsHandler)
{{#typed}}export {{/typed}}async function metricsHandler(req{{#typed}}: Request{{/typed}}, res{{#typed}}: Response{{/typed}}){{#typed}}: Promise<void>{{/typed}} {
  res.set('Content-Type', client.register.contentType);
  res.end(await client.register.metrics());
}
{{#untyped}}

module.exports = { httpRequestDuration, metricsHandler };
{{/untyped}}
"#;

const SENTRY: &str = r#"{{#typed}}
import * as Sentry from '@sentry/node';
{{/typed}}
{{#untyped}}
const Sentry = require('@sentry/node');
{{/untyped}}

// kiln:wire import this module first in src/server
{{#typed}}export {{/typed}}function initSentry(){{#typed}}: void{{/typed}} {
  if (!process.env.SENTRY_DSN) {
    return;
  }
  Sentry.init({
    dsn: process.env.SENTRY_DSN,
    environment: process.env.NODE_ENV ?? 'development',
    tracesSampleRate: 0.1,
  });
}
{{#untyped}}

module.exports = { initSentry, Sentry };
{{/untyped}}
{{#typed}}

export { Sentry };
{{/typed}}
"#;

const OPENTELEMETRY: &str = r#"{{#typed}}
import { NodeSDK } from '@opentelemetry/sdk-node';
import { getNodeAutoInstrumentations } from '@opentelemetry/auto-instrumentations-node';
import { OTLPTraceExporter } from '@opentelemetry/exporter-trace-otlp-http';
{{/typed}}
{{#untyped}}
const { NodeSDK } = require('@opentelemetry/sdk-node');
const { getNodeAutoInstrumentations } = require('@opentelemetry/auto-instrumentations-node');
const { OTLPTraceExporter } = require('@opentelemetry/exporter-trace-otlp-http');
{{/untyped}}

const sdk = new NodeSDK({
  traceExporter: new OTLPTraceExporter({
    url: process.env.OTEL_EXPORTER_OTLP_ENDPOINT ?? 'http://localhost:4318/v1/traces',
  }),
  instrumentations: [getNodeAutoInstrumentations()],
});

// kiln:wire call startTracing() before anything else in src/server
{{#typed}}export {{/typed}}function startTracing(){{#typed}}: void{{/typed}} {
  sdk.start();
  process.on('SIGTERM', () => {
    sdk.shutdown().finally(() => process.exit(0));
  });
}
{{#untyped}}

module.exports = { startTracing };
{{/untyped}}
"#;
