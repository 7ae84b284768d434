//! Multi-service layout: an API gateway proxying to a users service.

use super::{typed_dev, FeatureOutput};
use crate::domain::{
    entities::{ManifestPatch, OptionRecord},
    error::DomainError,
    rendering::RenderContext,
    value_objects::ArtifactKind,
};

/// (directory, port) of every generated service.
const SERVICES: [(&str, &str); 2] = [("gateway", "8080"), ("users", "3001")];

pub(super) fn generate(options: &OptionRecord) -> Result<FeatureOutput, DomainError> {
    let dialect = options.dialect();
    let base = RenderContext::new(dialect);
    let mut output = FeatureOutput::new();

    output.emit(
        "docker-compose.yml",
        DOCKER_COMPOSE,
        &base,
        ArtifactKind::Infrastructure,
    )?;

    for (service, port) in SERVICES {
        let ctx = base
            .clone()
            .with_variable("SERVICE", service)
            .with_variable("PORT", port);
        let source = if service == "gateway" { GATEWAY } else { USERS };

        output.emit(
            "services/{{SERVICE}}/package.json",
            SERVICE_MANIFEST,
            &ctx,
            ArtifactKind::Infrastructure,
        )?;
        output.emit(
            "services/{{SERVICE}}/src/index.{{EXT}}",
            source,
            &ctx,
            ArtifactKind::Source,
        )?;
    }

    let runner = if dialect.is_typed() { "ts-node" } else { "node" };
    let mut patch = ManifestPatch::new()
        .dependency("http-proxy-middleware", "^3.0.3")
        .dev_dependency("concurrently", "^9.1.0")
        .script(
            "dev:services",
            "concurrently \"npm:dev:gateway\" \"npm:dev:users\"",
        );
    for (service, _) in SERVICES {
        patch = patch.script(
            &format!("dev:{service}"),
            &format!(
                "{runner} services/{service}/src/index.{}",
                dialect.extension()
            ),
        );
    }
    output.patch = typed_dev(patch, dialect, &[("ts-node", "^10.9.2")]);

    Ok(output)
}

const DOCKER_COMPOSE: &str = r#"services:
  gateway:
    image: node:20-alpine
    working_dir: /app
    volumes:
      - ./:/app
    command: npm run dev:gateway
    ports:
      - "8080:8080"
    environment:
      GATEWAY_PORT: "8080"
      USERS_SERVICE_URL: http://users:3001
    depends_on:
      - users

  users:
    image: node:20-alpine
    working_dir: /app
    volumes:
      - ./:/app
    command: npm run dev:users
    ports:
      - "3001:3001"
    environment:
      PORT: "3001"
"#;

const SERVICE_MANIFEST: &str = r#"{
  "name": "{{SERVICE}}-service",
  "version": "1.0.0",
  "private": true,
  "main": "src/index.{{EXT}}",
  "scripts": {
{{#typed}}
    "start": "ts-node src/index.ts"
{{/typed}}
{{#untyped}}
    "start": "node src/index.js"
{{/untyped}}
  }
}
"#;

const GATEWAY: &str = r#"{{#typed}}
import express from 'express';
import { createProxyMiddleware } from 'http-proxy-middleware';
{{/typed}}
{{#untyped}}
const express = require('express');
const { createProxyMiddleware } = require('http-proxy-middleware');
{{/untyped}}

const app = express();
const port = Number(process.env.GATEWAY_PORT ?? {{PORT}});

app.get('/health', (_req, res) => {
  res.json({ status: 'ok', service: '{{SERVICE}}' });
});

app.use(
  '/users',
  createProxyMiddleware({
    target: process.env.USERS_SERVICE_URL ?? 'http://localhost:3001',
    changeOrigin: true,
  }),
);

app.listen(port, () => {
  console.log(`gateway listening on port ${port}`);
});
"#;

const USERS: &str = r#"{{#typed}}
import express from 'express';
{{/typed}}
{{#untyped}}
const express = require('express');
{{/untyped}}

const app = express();
const port = Number(process.env.PORT ?? {{PORT}});

app.use(express.json());

app.get('/health', (_req, res) => {
  res.json({ status: 'ok', service: '{{SERVICE}}' });
});

app.get('/', (_req, res) => {
  res.json([]);
});

app.listen(port, () => {
  console.log(`users service listening on port ${port}`);
});
"#;
