//! Swagger UI served from JSDoc annotations.

use super::{typed_dev, FeatureOutput};
use crate::domain::{
    entities::{ManifestPatch, OptionRecord},
    error::DomainError,
    rendering::RenderContext,
    value_objects::ArtifactKind,
};

pub(super) fn generate(options: &OptionRecord) -> Result<FeatureOutput, DomainError> {
    let ctx = RenderContext::new(options.dialect());
    let mut output = FeatureOutput::new();

    output.emit("src/config/swagger.{{EXT}}", SWAGGER, &ctx, ArtifactKind::Config)?;

    let patch = ManifestPatch::new()
        .dependency("swagger-ui-express", "^5.0.1")
        .dependency("swagger-jsdoc", "^6.2.8");
    output.patch = typed_dev(
        patch,
        options.dialect(),
        &[
            ("@types/swagger-ui-express", "^4.1.7"),
            ("@types/swagger-jsdoc", "^6.0.4"),
        ],
    );

    Ok(output)
}

const SWAGGER: &str = r#"{{#typed}}
import { Express } from 'express';
import swaggerJsdoc from 'swagger-jsdoc';
import swaggerUi from 'swagger-ui-express';
{{/typed}}
{{#untyped}}
const swaggerJsdoc = require('swagger-jsdoc');
const swaggerUi = require('swagger-ui-express');
{{/untyped}}

const spec = swaggerJsdoc({
  definition: {
    openapi: '3.0.0',
    info: {
      title: process.env.npm_package_name ?? 'API',
      version: process.env.npm_package_version ?? '1.0.0',
    },
  },
  apis: ['./src/routes/*.{{EXT}}'],
});

// kiln:wire call setupSwagger(app) in src/app
{{#typed}}export {{/typed}}function setupSwagger(app{{#typed}}: Express{{/typed}}){{#typed}}: void{{/typed}} {
  app.use('/docs', swaggerUi.serve, swaggerUi.setup(spec));
  app.get('/docs.json', (_req, res) => {
    res.json(spec);
  });
}
{{#untyped}}

module.exports = { setupSwagger };
{{/untyped}}
"#;
