//! Built-in Express skeleton, rendered without network access.

use kiln_core::{
    application::{ApplicationError, ports::BaseTemplateSource},
    domain::{Artifact, ArtifactKind, Dialect, Manifest, OptionRecord, RenderContext},
    error::KilnResult,
};
use serde_json::Value;

const DEPENDENCIES: &[(&str, &str)] = &[
    ("cors", "^2.8.5"),
    ("express", "^4.21.2"),
    ("morgan", "^1.10.0"),
];

const TYPED_DEV_DEPENDENCIES: &[(&str, &str)] = &[
    ("@types/cors", "^2.8.17"),
    ("@types/express", "^5.0.0"),
    ("@types/morgan", "^1.9.9"),
    ("@types/node", "^22.10.2"),
    ("nodemon", "^3.1.9"),
    ("ts-node", "^10.9.2"),
    ("typescript", "^5.7.2"),
];

const UNTYPED_DEV_DEPENDENCIES: &[(&str, &str)] = &[("nodemon", "^3.1.9")];

const TYPED_SCRIPTS: &[(&str, &str)] = &[
    ("build", "tsc"),
    ("dev", "nodemon --exec ts-node src/server.ts"),
    ("start", "node dist/server.js"),
];

const UNTYPED_SCRIPTS: &[(&str, &str)] = &[
    ("dev", "nodemon src/server.js"),
    ("start", "node src/server.js"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplate;

impl BuiltinTemplate {
    pub fn new() -> Self {
        Self
    }

    fn manifest(project_name: &str, dialect: Dialect) -> KilnResult<String> {
        let mut manifest = Manifest::default_for(project_name);
        manifest.extra.insert("private".into(), Value::Bool(true));

        let (main, scripts, dev) = match dialect {
            Dialect::Typed => ("dist/server.js", TYPED_SCRIPTS, TYPED_DEV_DEPENDENCIES),
            Dialect::Untyped => ("src/server.js", UNTYPED_SCRIPTS, UNTYPED_DEV_DEPENDENCIES),
        };
        manifest.extra.insert("main".into(), Value::String(main.into()));

        for (name, command) in scripts {
            manifest.scripts.insert(name.to_string(), command.to_string());
        }
        for (name, version) in DEPENDENCIES {
            manifest.dependencies.insert(name.to_string(), version.to_string());
        }
        for (name, version) in dev {
            manifest.dev_dependencies.insert(name.to_string(), version.to_string());
        }

        manifest.to_json().map_err(|e| {
            ApplicationError::ManifestError {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl BaseTemplateSource for BuiltinTemplate {
    fn name(&self) -> String {
        "builtin".to_string()
    }

    fn acquire(&self, project_name: &str, options: &OptionRecord) -> KilnResult<Vec<Artifact>> {
        let dialect = options.dialect();
        let ctx = RenderContext::new(dialect).with_variable("PROJECT_NAME", project_name);

        let mut artifacts = vec![Artifact::new(
            "package.json",
            Self::manifest(project_name, dialect)?,
            ArtifactKind::Config,
            dialect,
        )?];
        if dialect.is_typed() {
            artifacts.push(Artifact::new(
                Dialect::MARKER_FILE,
                TSCONFIG,
                ArtifactKind::Config,
                dialect,
            )?);
        }

        let sources = [
            ("src/app.{{EXT}}", APP),
            ("src/server.{{EXT}}", SERVER),
            ("src/routes/index.{{EXT}}", ROUTES),
        ];
        for (path, template) in sources {
            artifacts.push(Artifact::new(
                &ctx.render(path),
                ctx.render(template),
                ArtifactKind::Source,
                dialect,
            )?);
        }

        artifacts.push(Artifact::new(".gitignore", GITIGNORE, ArtifactKind::Document, dialect)?);
        artifacts.push(Artifact::new(
            "README.md",
            ctx.render(README),
            ArtifactKind::Document,
            dialect,
        )?);

        Ok(artifacts)
    }
}

const TSCONFIG: &str = r#"{
  "compilerOptions": {
    "target": "ES2022",
    "module": "commonjs",
    "rootDir": "src",
    "outDir": "dist",
    "strict": true,
    "esModuleInterop": true,
    "experimentalDecorators": true,
    "emitDecoratorMetadata": true,
    "skipLibCheck": true,
    "forceConsistentCasingInFileNames": true,
    "resolveJsonModule": true
  },
  "include": ["src"],
  "exclude": ["node_modules", "dist", "tests"]
}
"#;

const APP: &str = r#"{{#typed}}
import express from 'express';
import cors from 'cors';
import morgan from 'morgan';
import routes from './routes';
{{/typed}}
{{#untyped}}
const express = require('express');
const cors = require('cors');
const morgan = require('morgan');
const routes = require('./routes');
{{/untyped}}

const app = express();

app.use(cors());
app.use(express.json());
app.use(morgan('dev'));
// kiln:wire app-level middleware (rate limiting, docs) goes here

app.get('/health', (_req, res) => {
  res.json({ status: 'ok' });
});

app.use('/api', routes);

{{#typed}}
export default app;
{{/typed}}
{{#untyped}}
module.exports = app;
{{/untyped}}
"#;

const SERVER: &str = r#"{{#typed}}
import app from './app';
{{/typed}}
{{#untyped}}
const app = require('./app');
{{/untyped}}

const port = Number(process.env.PORT ?? 3000);

// kiln:wire connect the database and realtime server before listening
app.listen(port, () => {
  console.log(`{{PROJECT_NAME}} listening on port ${port}`);
});
"#;

const ROUTES: &str = r#"{{#typed}}
import { Router } from 'express';
{{/typed}}
{{#untyped}}
const { Router } = require('express');
{{/untyped}}

const router = Router();

// kiln:wire mount resource routers here
router.get('/', (_req, res) => {
  res.json({ message: 'ok' });
});

{{#typed}}
export default router;
{{/typed}}
{{#untyped}}
module.exports = router;
{{/untyped}}
"#;

const GITIGNORE: &str = "node_modules/\ndist/\ncoverage/\n.env\n";

const README: &str = r#"# {{PROJECT_NAME}}

Express service written in {{LANGUAGE}}.

```sh
npm install
npm run dev
```

Health check: `GET /health`.
"#;
