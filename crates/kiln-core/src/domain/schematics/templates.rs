//! One template per schematic kind.
//!
//! Templates see the variables set up by `schematics::context`:
//! `NAME`, `NAME_CAMEL`, `NAME_KEBAB`, `NAME_PLURAL`, `CONTROLLER_NAME`,
//! `SERVICE_NAME`, `MIDDLEWARE_NAME`, `ROUTER_NAME`, `MODEL_NAME`,
//! `INTERFACE_NAME`, plus the dialect flags.

use crate::domain::value_objects::{Dialect, SchematicKind};

#[derive(Debug, Clone, Copy)]
pub struct SchematicTemplate {
    pub kind: SchematicKind,

    /// Directory under the project root.
    pub dir: &'static str,

    /// Middle segment of the file name: `{stem}.{role}.{ext}`.
    pub role: &'static str,

    pub template: &'static str,
}

impl SchematicTemplate {
    pub fn path(&self, stem: &str, dialect: Dialect) -> String {
        format!("{}/{stem}.{}.{}", self.dir, self.role, dialect.extension())
    }
}

pub static SCHEMATIC_TEMPLATES: &[SchematicTemplate] = &[
    SchematicTemplate {
        kind: SchematicKind::Controller,
        dir: "src/controllers",
        role: "controller",
        template: CONTROLLER,
    },
    SchematicTemplate {
        kind: SchematicKind::Service,
        dir: "src/services",
        role: "service",
        template: SERVICE,
    },
    SchematicTemplate {
        kind: SchematicKind::Middleware,
        dir: "src/middleware",
        role: "middleware",
        template: MIDDLEWARE,
    },
    SchematicTemplate {
        kind: SchematicKind::Route,
        dir: "src/routes",
        role: "routes",
        template: ROUTE,
    },
    SchematicTemplate {
        kind: SchematicKind::Model,
        dir: "src/models",
        role: "model",
        template: MODEL,
    },
    SchematicTemplate {
        kind: SchematicKind::Interface,
        dir: "src/interfaces",
        role: "interface",
        template: INTERFACE,
    },
    SchematicTemplate {
        kind: SchematicKind::Test,
        dir: "tests",
        role: "test",
        template: TEST,
    },
];

pub fn find(kind: SchematicKind) -> Option<&'static SchematicTemplate> {
    SCHEMATIC_TEMPLATES.iter().find(|t| t.kind == kind)
}

const CONTROLLER: &str = r#"{{#typed}}
import { Request, Response, NextFunction } from 'express';
import { {{SERVICE_NAME}} } from '../services/{{NAME_KEBAB}}.service';
{{/typed}}
{{#untyped}}
const { {{SERVICE_NAME}} } = require('../services/{{NAME_KEBAB}}.service');
{{/untyped}}

{{#typed}}export {{/typed}}class {{CONTROLLER_NAME}} {
  {{#typed}}private readonly {{/typed}}service = new {{SERVICE_NAME}}();

  list = async (req{{#typed}}: Request{{/typed}}, res{{#typed}}: Response{{/typed}}, next{{#typed}}: NextFunction{{/typed}}) => {
    try {
      res.json(await this.service.findAll());
    } catch (err) {
      next(err);
    }
  };

  get = async (req{{#typed}}: Request{{/typed}}, res{{#typed}}: Response{{/typed}}, next{{#typed}}: NextFunction{{/typed}}) => {
    try {
      const item = await this.service.findById(req.params.id);
      if (!item) {
        res.status(404).json({ message: '{{NAME}} not found' });
        return;
      }
      res.json(item);
    } catch (err) {
      next(err);
    }
  };

  create = async (req{{#typed}}: Request{{/typed}}, res{{#typed}}: Response{{/typed}}, next{{#typed}}: NextFunction{{/typed}}) => {
    try {
      res.status(201).json(await this.service.create(req.body));
    } catch (err) {
      next(err);
    }
  };

  update = async (req{{#typed}}: Request{{/typed}}, res{{#typed}}: Response{{/typed}}, next{{#typed}}: NextFunction{{/typed}}) => {
    try {
      const item = await this.service.update(req.params.id, req.body);
      if (!item) {
        res.status(404).json({ message: '{{NAME}} not found' });
        return;
      }
      res.json(item);
    } catch (err) {
      next(err);
    }
  };

  remove = async (req{{#typed}}: Request{{/typed}}, res{{#typed}}: Response{{/typed}}, next{{#typed}}: NextFunction{{/typed}}) => {
    try {
      const removed = await this.service.remove(req.params.id);
      res.status(removed ? 204 : 404).end();
    } catch (err) {
      next(err);
    }
  };
}
{{#untyped}}

module.exports = { {{CONTROLLER_NAME}} };
{{/untyped}}
"#;

const SERVICE: &str = r#"{{#typed}}
import { randomUUID } from 'crypto';
import { {{MODEL_NAME}} } from '../models/{{NAME_KEBAB}}.model';
{{/typed}}
{{#untyped}}
const { randomUUID } = require('crypto');
const { {{MODEL_NAME}} } = require('../models/{{NAME_KEBAB}}.model');
{{/untyped}}

// kiln:wire replace the in-memory store with the persistence layer
{{#typed}}export {{/typed}}class {{SERVICE_NAME}} {
  {{#typed}}private {{/typed}}items{{#typed}}: Map<string, {{MODEL_NAME}}>{{/typed}} = new Map();

  async findAll(){{#typed}}: Promise<{{MODEL_NAME}}[]>{{/typed}} {
    return [...this.items.values()];
  }

  async findById(id{{#typed}}: string{{/typed}}){{#typed}}: Promise<{{MODEL_NAME}} | undefined>{{/typed}} {
    return this.items.get(id);
  }

  async create(data{{#typed}}: Partial<{{MODEL_NAME}}>{{/typed}}){{#typed}}: Promise<{{MODEL_NAME}}>{{/typed}} {
    const item = new {{MODEL_NAME}}({ ...data, id: randomUUID() });
    this.items.set(item.id, item);
    return item;
  }

  async update(id{{#typed}}: string{{/typed}}, data{{#typed}}: Partial<{{MODEL_NAME}}>{{/typed}}){{#typed}}: Promise<{{MODEL_NAME}} | undefined>{{/typed}} {
    const existing = this.items.get(id);
    if (!existing) {
      return undefined;
    }
    const updated = new {{MODEL_NAME}}({ ...existing, ...data, id });
    this.items.set(id, updated);
    return updated;
  }

  async remove(id{{#typed}}: string{{/typed}}){{#typed}}: Promise<boolean>{{/typed}} {
    return this.items.delete(id);
  }
}
{{#untyped}}

module.exports = { {{SERVICE_NAME}} };
{{/untyped}}
"#;

const MIDDLEWARE: &str = r#"{{#typed}}
import { Request, Response, NextFunction } from 'express';

{{/typed}}
{{#typed}}export {{/typed}}function {{MIDDLEWARE_NAME}}(req{{#typed}}: Request{{/typed}}, res{{#typed}}: Response{{/typed}}, next{{#typed}}: NextFunction{{/typed}}){{#typed}}: void{{/typed}} {
  // kiln:wire register with app.use({{MIDDLEWARE_NAME}}) or on a router
  next();
}
{{#untyped}}

module.exports = { {{MIDDLEWARE_NAME}} };
{{/untyped}}
"#;

const ROUTE: &str = r#"{{#typed}}
import { Router } from 'express';
import { {{CONTROLLER_NAME}} } from '../controllers/{{NAME_KEBAB}}.controller';
{{/typed}}
{{#untyped}}
const { Router } = require('express');
const { {{CONTROLLER_NAME}} } = require('../controllers/{{NAME_KEBAB}}.controller');
{{/untyped}}

const controller = new {{CONTROLLER_NAME}}();

// kiln:wire mount in src/routes/index with router.use('/{{NAME_PLURAL}}', {{ROUTER_NAME}})
{{#typed}}export {{/typed}}const {{ROUTER_NAME}} = Router();

{{ROUTER_NAME}}.get('/', controller.list);
{{ROUTER_NAME}}.get('/:id', controller.get);
{{ROUTER_NAME}}.post('/', controller.create);
{{ROUTER_NAME}}.put('/:id', controller.update);
{{ROUTER_NAME}}.delete('/:id', controller.remove);
{{#untyped}}

module.exports = { {{ROUTER_NAME}} };
{{/untyped}}
"#;

const MODEL: &str = r#"{{#typed}}export {{/typed}}class {{MODEL_NAME}} {
{{#typed}}
  id: string;
  createdAt: Date;
  [key: string]: unknown;

{{/typed}}
  constructor(data{{#typed}}: Partial<{{MODEL_NAME}}> & { id: string }{{/typed}}) {
    Object.assign(this, data);
    this.id = data.id;
    this.createdAt = data.createdAt ?? new Date();
  }
}
{{#untyped}}

module.exports = { {{MODEL_NAME}} };
{{/untyped}}
"#;

const INTERFACE: &str = r#"export interface {{INTERFACE_NAME}} {
  id: string;
  createdAt: Date;
}

export type Create{{NAME}}Input = Omit<{{INTERFACE_NAME}}, 'id' | 'createdAt'>;

export type Update{{NAME}}Input = Partial<Create{{NAME}}Input>;
"#;

const TEST: &str = r#"{{#typed}}
import request from 'supertest';
import app from '../src/app';
{{/typed}}
{{#untyped}}
const request = require('supertest');
const app = require('../src/app');
{{/untyped}}

describe('{{NAME}}', () => {
  it('responds on /api/{{NAME_PLURAL}}', async () => {
    const res = await request(app).get('/api/{{NAME_PLURAL}}');
    expect([200, 404]).toContain(res.status);
  });
});
"#;
