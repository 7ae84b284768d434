//! Database connection wiring for the resolved data-access technology.

use super::{typed_dev, FeatureOutput};
use crate::domain::{
    capabilities,
    entities::{ManifestPatch, OptionRecord},
    error::DomainError,
    rendering::RenderContext,
    value_objects::{ArtifactKind, DataAccess, FeatureKind, PersistenceBackend},
};

const PRISMA_VERSION: &str = "^5.22.0";

pub(super) fn generate(options: &OptionRecord) -> Result<FeatureOutput, DomainError> {
    let backend = options.persistence();
    let not_configured = || DomainError::FeatureNotConfigured {
        feature: FeatureKind::Persistence.to_string(),
        reason: "no persistence backend selected".into(),
    };
    let backend_def = capabilities::find_backend(backend).ok_or_else(not_configured)?;
    let tech = options.data_access().ok_or_else(not_configured)?;
    let dialect = options.dialect();

    let ctx = RenderContext::new(dialect)
        .with_variable("DATABASE_URL", backend_def.example_url)
        .with_variable("PRISMA_PROVIDER", backend_def.prisma_provider)
        .with_variable("TYPEORM_TYPE", backend.as_str())
        .with_variable("HANDLE", handle_name(tech, backend))
        .with_flag("prisma", tech == DataAccess::Prisma)
        .with_flag("sequelize", tech == DataAccess::Sequelize)
        .with_flag("typeorm", tech == DataAccess::TypeOrm)
        .with_flag("mongoose", tech == DataAccess::Mongoose)
        .with_flag("driver", tech == DataAccess::Driver)
        .with_flag("postgres", backend == PersistenceBackend::Postgres)
        .with_flag("mysql", backend == PersistenceBackend::Mysql)
        .with_flag("sqlite", backend == PersistenceBackend::Sqlite)
        .with_flag("mongodb", backend == PersistenceBackend::Mongodb)
        .with_flag("relational", backend.is_relational())
        .with_flag("remote", backend != PersistenceBackend::Sqlite);

    let mut output = FeatureOutput::new();
    output.emit(
        "src/config/database.{{EXT}}",
        DATABASE_CONFIG,
        &ctx,
        ArtifactKind::Config,
    )?;

    match tech {
        DataAccess::Prisma => {
            output.emit(
                "prisma/schema.prisma",
                PRISMA_SCHEMA,
                &ctx,
                ArtifactKind::Document,
            )?;
        }
        DataAccess::Sequelize => {
            output.emit(
                "src/models/index.{{EXT}}",
                SEQUELIZE_MODELS,
                &ctx,
                ArtifactKind::Source,
            )?;
        }
        _ => {}
    }

    let patch = dependencies(
        tech,
        backend,
        backend_def.driver_package,
        backend_def.driver_version,
    );
    output.patch = match (tech, backend) {
        (DataAccess::Driver, PersistenceBackend::Postgres) => {
            typed_dev(patch, dialect, &[("@types/pg", "^8.11.10")])
        }
        (DataAccess::Driver, PersistenceBackend::Sqlite) => {
            typed_dev(patch, dialect, &[("@types/better-sqlite3", "^7.6.12")])
        }
        _ => patch,
    };

    Ok(output)
}

fn dependencies(
    tech: DataAccess,
    backend: PersistenceBackend,
    driver: &str,
    driver_version: &str,
) -> ManifestPatch {
    let patch = ManifestPatch::new();
    match tech {
        DataAccess::Prisma => patch
            .dependency("@prisma/client", PRISMA_VERSION)
            .dev_dependency("prisma", PRISMA_VERSION)
            .script("prisma:generate", "prisma generate")
            .script("prisma:migrate", "prisma migrate dev"),
        DataAccess::Sequelize => {
            let patch = patch
                .dependency("sequelize", "^6.37.5")
                .dependency(driver, driver_version);
            if backend == PersistenceBackend::Postgres {
                patch.dependency("pg-hstore", "^2.3.4")
            } else {
                patch
            }
        }
        DataAccess::TypeOrm => patch
            .dependency("typeorm", "^0.3.20")
            .dependency("reflect-metadata", "^0.2.2")
            .dependency(driver, driver_version),
        DataAccess::Mongoose => patch.dependency("mongoose", "^8.8.4"),
        DataAccess::Driver if backend == PersistenceBackend::Sqlite => {
            patch.dependency("better-sqlite3", "^11.7.0")
        }
        DataAccess::Driver => patch.dependency(driver, driver_version),
    }
}

/// Name of the exported connection handle.
fn handle_name(tech: DataAccess, backend: PersistenceBackend) -> &'static str {
    match (tech, backend) {
        (DataAccess::Prisma, _) => "prisma",
        (DataAccess::Sequelize, _) => "sequelize",
        (DataAccess::TypeOrm, _) => "dataSource",
        (DataAccess::Mongoose, _) => "mongoose",
        (DataAccess::Driver, PersistenceBackend::Sqlite) => "db",
        (DataAccess::Driver, PersistenceBackend::Mongodb) => "client",
        (DataAccess::Driver, _) => "pool",
    }
}

const DATABASE_CONFIG: &str = r#"{{#prisma}}
{{#typed}}
import { PrismaClient } from '@prisma/client';
{{/typed}}
{{#untyped}}
const { PrismaClient } = require('@prisma/client');
{{/untyped}}

const prisma = new PrismaClient();

async function connectDatabase(){{#typed}}: Promise<void>{{/typed}} {
  await prisma.$connect();
}
{{/prisma}}
{{#sequelize}}
{{#typed}}
import { Sequelize } from 'sequelize';
{{/typed}}
{{#untyped}}
const { Sequelize } = require('sequelize');
{{/untyped}}

{{#sqlite}}
const sequelize = new Sequelize({
  dialect: 'sqlite',
  storage: (process.env.DATABASE_URL ?? '{{DATABASE_URL}}').replace('file:', ''),
  logging: false,
});
{{/sqlite}}
{{#remote}}
const sequelize = new Sequelize(process.env.DATABASE_URL ?? '{{DATABASE_URL}}', {
  logging: false,
});
{{/remote}}

async function connectDatabase(){{#typed}}: Promise<void>{{/typed}} {
  await sequelize.authenticate();
}
{{/sequelize}}
{{#typeorm}}
{{#typed}}
import 'reflect-metadata';
import { DataSource } from 'typeorm';
{{/typed}}
{{#untyped}}
require('reflect-metadata');
const { DataSource } = require('typeorm');
{{/untyped}}

const dataSource = new DataSource({
  type: '{{TYPEORM_TYPE}}',
{{#sqlite}}
  database: (process.env.DATABASE_URL ?? '{{DATABASE_URL}}').replace('file:', ''),
{{/sqlite}}
{{#remote}}
  url: process.env.DATABASE_URL ?? '{{DATABASE_URL}}',
{{/remote}}
  entities: [__dirname + '/../entities/*.{{EXT}}'],
  synchronize: process.env.NODE_ENV !== 'production',
});

async function connectDatabase(){{#typed}}: Promise<void>{{/typed}} {
  await dataSource.initialize();
}
{{/typeorm}}
{{#mongoose}}
{{#typed}}
import mongoose from 'mongoose';
{{/typed}}
{{#untyped}}
const mongoose = require('mongoose');
{{/untyped}}

async function connectDatabase(){{#typed}}: Promise<void>{{/typed}} {
  await mongoose.connect(process.env.DATABASE_URL ?? '{{DATABASE_URL}}');
}
{{/mongoose}}
{{#driver}}
{{#postgres}}
{{#typed}}
import { Pool } from 'pg';
{{/typed}}
{{#untyped}}
const { Pool } = require('pg');
{{/untyped}}

const pool = new Pool({ connectionString: process.env.DATABASE_URL ?? '{{DATABASE_URL}}' });

async function connectDatabase(){{#typed}}: Promise<void>{{/typed}} {
  const client = await pool.connect();
  client.release();
}
{{/postgres}}
{{#mysql}}
{{#typed}}
import mysql from 'mysql2/promise';
{{/typed}}
{{#untyped}}
const mysql = require('mysql2/promise');
{{/untyped}}

const pool = mysql.createPool(process.env.DATABASE_URL ?? '{{DATABASE_URL}}');

async function connectDatabase(){{#typed}}: Promise<void>{{/typed}} {
  await pool.query('SELECT 1');
}
{{/mysql}}
{{#sqlite}}
{{#typed}}
import Database from 'better-sqlite3';
{{/typed}}
{{#untyped}}
const Database = require('better-sqlite3');
{{/untyped}}

const db = new Database((process.env.DATABASE_URL ?? '{{DATABASE_URL}}').replace('file:', ''));

async function connectDatabase(){{#typed}}: Promise<void>{{/typed}} {
  db.pragma('journal_mode = WAL');
}
{{/sqlite}}
{{#mongodb}}
{{#typed}}
import { MongoClient } from 'mongodb';
{{/typed}}
{{#untyped}}
const { MongoClient } = require('mongodb');
{{/untyped}}

const client = new MongoClient(process.env.DATABASE_URL ?? '{{DATABASE_URL}}');

async function connectDatabase(){{#typed}}: Promise<void>{{/typed}} {
  await client.connect();
}
{{/mongodb}}
{{/driver}}

// kiln:wire call connectDatabase() in src/server before app.listen
{{#typed}}
export { {{HANDLE}}, connectDatabase };
{{/typed}}
{{#untyped}}
module.exports = { {{HANDLE}}, connectDatabase };
{{/untyped}}
"#;

const PRISMA_SCHEMA: &str = r#"generator client {
  provider = "prisma-client-js"
}

datasource db {
  provider = "{{PRISMA_PROVIDER}}"
  url      = env("DATABASE_URL")
}

model Example {
{{#mongodb}}
  id        String   @id @default(auto()) @map("_id") @db.ObjectId
{{/mongodb}}
{{#relational}}
  id        Int      @id @default(autoincrement())
{{/relational}}
  name      String
  createdAt DateTime @default(now())
}
"#;

const SEQUELIZE_MODELS: &str = r#"{{#typed}}
import { sequelize } from '../config/database';
{{/typed}}
{{#untyped}}
const { sequelize } = require('../config/database');
{{/untyped}}

// kiln:wire define models here, then call syncModels() after connectDatabase()
{{#typed}}export {{/typed}}async function syncModels(){{#typed}}: Promise<void>{{/typed}} {
  await sequelize.sync();
}
{{#untyped}}

module.exports = { syncModels };
{{/untyped}}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{DataAccessChoice, Dialect};

    fn record(backend: PersistenceBackend, choice: DataAccessChoice, dialect: Dialect) -> OptionRecord {
        OptionRecord::builder()
            .dialect(dialect)
            .persistence(backend)
            .data_access(choice)
            .build()
            .unwrap()
    }

    #[test]
    fn prisma_emits_schema_and_client() {
        let options = record(PersistenceBackend::Postgres, DataAccessChoice::Auto, Dialect::Typed);
        let output = generate(&options).unwrap();

        assert_eq!(
            output.artifacts.paths(),
            vec!["src/config/database.ts", "prisma/schema.prisma"]
        );
        let schema = output.artifacts.iter().nth(1).unwrap().content();
        assert!(schema.contains("provider = \"postgresql\""));
        assert!(schema.contains("@default(autoincrement())"));
        assert!(!schema.contains("ObjectId"));

        assert_eq!(
            output.patch.dependencies.keys().collect::<Vec<_>>(),
            vec!["@prisma/client"]
        );
        assert_eq!(
            output.patch.dev_dependencies.keys().collect::<Vec<_>>(),
            vec!["prisma"]
        );
    }

    #[test]
    fn config_contains_only_the_selected_technology() {
        let options = record(
            PersistenceBackend::Mysql,
            DataAccessChoice::Explicit(DataAccess::Sequelize),
            Dialect::Untyped,
        );
        let output = generate(&options).unwrap();
        let config = output.artifacts.iter().next().unwrap().content();

        assert!(config.starts_with("const { Sequelize } = require('sequelize');"));
        assert!(config.contains("module.exports = { sequelize, connectDatabase };"));
        assert!(!config.contains("PrismaClient"));
        assert!(!config.contains("dialect: 'sqlite'"));
        assert_eq!(output.patch.dependencies["mysql2"], "^3.11.5");
        assert!(output.artifacts.paths().contains(&"src/models/index.js"));
    }

    #[test]
    fn sequelize_on_postgres_adds_hstore() {
        let options = record(
            PersistenceBackend::Postgres,
            DataAccessChoice::Explicit(DataAccess::Sequelize),
            Dialect::Typed,
        );
        let patch = generate(&options).unwrap().patch;
        assert!(patch.dependencies.contains_key("pg"));
        assert!(patch.dependencies.contains_key("pg-hstore"));
    }

    #[test]
    fn mongoose_for_mongodb() {
        let options = record(PersistenceBackend::Mongodb, DataAccessChoice::Auto, Dialect::Typed);
        let output = generate(&options).unwrap();
        let config = output.artifacts.iter().next().unwrap().content();
        assert!(config.starts_with("import mongoose from 'mongoose';"));
        assert!(config.contains("mongodb://localhost:27017/app"));
        assert!(config.contains("export { mongoose, connectDatabase };"));
        assert_eq!(output.artifacts.len(), 1);
    }

    #[test]
    fn raw_sqlite_driver_uses_better_sqlite3() {
        let options = record(
            PersistenceBackend::Sqlite,
            DataAccessChoice::Explicit(DataAccess::Driver),
            Dialect::Typed,
        );
        let output = generate(&options).unwrap();
        assert!(output.patch.dependencies.contains_key("better-sqlite3"));
        assert!(output.patch.dev_dependencies.contains_key("@types/better-sqlite3"));
        assert!(output
            .artifacts
            .iter()
            .next()
            .unwrap()
            .content()
            .contains("export { db, connectDatabase };"));
    }

    #[test]
    fn typeorm_pulls_driver_and_reflect_metadata() {
        let options = record(
            PersistenceBackend::Postgres,
            DataAccessChoice::Explicit(DataAccess::TypeOrm),
            Dialect::Typed,
        );
        let output = generate(&options).unwrap();
        let config = output.artifacts.iter().next().unwrap().content();
        assert!(config.contains("type: 'postgres',"));
        assert!(config.contains("url: process.env.DATABASE_URL"));
        assert!(output.patch.dependencies.contains_key("reflect-metadata"));
        assert!(output.patch.dependencies.contains_key("pg"));
    }

    #[test]
    fn no_backend_is_not_configured() {
        let err = generate(&OptionRecord::default()).unwrap_err();
        assert!(matches!(err, DomainError::FeatureNotConfigured { .. }));
    }
}
