//! Authentication, capability authorization and role middleware.
//!
//! The three generators are independent: authorization and roles read
//! `req.user` if something populated it, but never import the auth
//! feature's files.

use super::{typed_dev, FeatureOutput};
use crate::domain::{
    entities::{ManifestPatch, OptionRecord},
    error::DomainError,
    rendering::RenderContext,
    value_objects::{ArtifactKind, SchematicKind},
};

pub(super) fn generate_auth(options: &OptionRecord) -> Result<FeatureOutput, DomainError> {
    let ctx = RenderContext::new(options.dialect());
    let mut output = FeatureOutput::new();

    output.emit("src/config/auth.{{EXT}}", AUTH_CONFIG, &ctx, ArtifactKind::Config)?;
    output.emit(
        "src/middleware/auth.middleware.{{EXT}}",
        AUTH_MIDDLEWARE,
        &ctx,
        ArtifactKind::Schematic(SchematicKind::Middleware),
    )?;
    output.emit("src/utils/token.{{EXT}}", TOKEN_UTILS, &ctx, ArtifactKind::Source)?;

    let patch = ManifestPatch::new()
        .dependency("jsonwebtoken", "^9.0.2")
        .dependency("bcryptjs", "^2.4.3");
    output.patch = typed_dev(
        patch,
        options.dialect(),
        &[
            ("@types/jsonwebtoken", "^9.0.7"),
            ("@types/bcryptjs", "^2.4.6"),
        ],
    );

    Ok(output)
}

pub(super) fn generate_authorization(
    options: &OptionRecord,
) -> Result<FeatureOutput, DomainError> {
    let ctx = RenderContext::new(options.dialect());
    let mut output = FeatureOutput::new();

    output.emit(
        "src/config/abilities.{{EXT}}",
        ABILITIES_CONFIG,
        &ctx,
        ArtifactKind::Config,
    )?;
    output.emit(
        "src/middleware/authorize.middleware.{{EXT}}",
        AUTHORIZE_MIDDLEWARE,
        &ctx,
        ArtifactKind::Schematic(SchematicKind::Middleware),
    )?;
    output.patch = ManifestPatch::new().dependency("@casl/ability", "^6.7.2");

    Ok(output)
}

pub(super) fn generate_roles(options: &OptionRecord) -> Result<FeatureOutput, DomainError> {
    let ctx = RenderContext::new(options.dialect());
    let mut output = FeatureOutput::new();

    output.emit(
        "src/middleware/role.middleware.{{EXT}}",
        ROLE_MIDDLEWARE,
        &ctx,
        ArtifactKind::Schematic(SchematicKind::Middleware),
    )?;

    Ok(output)
}

const AUTH_CONFIG: &str = r#"{{#typed}}export {{/typed}}const authConfig = {
  jwtSecret: process.env.JWT_SECRET ?? 'change-me',
  expiresIn: process.env.JWT_EXPIRES_IN ?? '1h',
  saltRounds: 10,
};
{{#untyped}}

module.exports = { authConfig };
{{/untyped}}
"#;

const TOKEN_UTILS: &str = r#"{{#typed}}
import jwt from 'jsonwebtoken';
import bcrypt from 'bcryptjs';
import { authConfig } from '../config/auth';

export interface TokenPayload {
  sub: string;
  role?: string;
}
{{/typed}}
{{#untyped}}
const jwt = require('jsonwebtoken');
const bcrypt = require('bcryptjs');
const { authConfig } = require('../config/auth');
{{/untyped}}

{{#typed}}export {{/typed}}function signToken(payload{{#typed}}: TokenPayload{{/typed}}){{#typed}}: string{{/typed}} {
  return jwt.sign(payload, authConfig.jwtSecret, { expiresIn: authConfig.expiresIn }{{#typed}} as jwt.SignOptions{{/typed}});
}

{{#typed}}export {{/typed}}function verifyToken(token{{#typed}}: string{{/typed}}){{#typed}}: TokenPayload{{/typed}} {
  return jwt.verify(token, authConfig.jwtSecret){{#typed}} as TokenPayload{{/typed}};
}

{{#typed}}export {{/typed}}async function hashPassword(password{{#typed}}: string{{/typed}}){{#typed}}: Promise<string>{{/typed}} {
  return bcrypt.hash(password, authConfig.saltRounds);
}

{{#typed}}export {{/typed}}async function comparePassword(password{{#typed}}: string{{/typed}}, hash{{#typed}}: string{{/typed}}){{#typed}}: Promise<boolean>{{/typed}} {
  return bcrypt.compare(password, hash);
}
{{#untyped}}

module.exports = { signToken, verifyToken, hashPassword, comparePassword };
{{/untyped}}
"#;

const AUTH_MIDDLEWARE: &str = r#"{{#typed}}
import { Request, Response, NextFunction } from 'express';
import { verifyToken, TokenPayload } from '../utils/token';

export interface AuthenticatedRequest extends Request {
  user?: TokenPayload;
}
{{/typed}}
{{#untyped}}
const { verifyToken } = require('../utils/token');
{{/untyped}}

{{#typed}}export {{/typed}}function authenticate(req{{#typed}}: AuthenticatedRequest{{/typed}}, res{{#typed}}: Response{{/typed}}, next{{#typed}}: NextFunction{{/typed}}){{#typed}}: void{{/typed}} {
  const header = req.headers.authorization;
  if (!header || !header.startsWith('Bearer ')) {
    res.status(401).json({ message: 'Missing bearer token' });
    return;
  }

  try {
    req.user = verifyToken(header.slice('Bearer '.length));
    next();
  } catch {
    res.status(401).json({ message: 'Invalid or expired token' });
  }
}
{{#untyped}}

module.exports = { authenticate };
{{/untyped}}
"#;

const ABILITIES_CONFIG: &str = r#"{{#typed}}
import { AbilityBuilder, createMongoAbility, MongoAbility } from '@casl/ability';

export interface AppUser {
  id: string;
  role?: string;
}

export type AppAbility = MongoAbility;
{{/typed}}
{{#untyped}}
const { AbilityBuilder, createMongoAbility } = require('@casl/ability');
{{/untyped}}

// kiln:wire adjust the rules to the resources of this service
{{#typed}}export {{/typed}}function defineAbilityFor(user{{#typed}}?: AppUser{{/typed}}){{#typed}}: AppAbility{{/typed}} {
  const { can, build } = new AbilityBuilder(createMongoAbility);

  if (user?.role === 'admin') {
    can('manage', 'all');
  } else if (user) {
    can('read', 'all');
    can('update', 'User', { id: user.id });
  } else {
    can('read', 'Public');
  }

  return build();
}
{{#untyped}}

module.exports = { defineAbilityFor };
{{/untyped}}
"#;

const AUTHORIZE_MIDDLEWARE: &str = r#"{{#typed}}
import { Request, Response, NextFunction, RequestHandler } from 'express';
import { defineAbilityFor, AppUser } from '../config/abilities';
{{/typed}}
{{#untyped}}
const { defineAbilityFor } = require('../config/abilities');
{{/untyped}}

{{#typed}}export {{/typed}}function authorize(action{{#typed}}: string{{/typed}}, subject{{#typed}}: string{{/typed}}){{#typed}}: RequestHandler{{/typed}} {
  return (req{{#typed}}: Request{{/typed}}, res{{#typed}}: Response{{/typed}}, next{{#typed}}: NextFunction{{/typed}}) => {
    const user = (req{{#typed}} as Request & { user?: AppUser }{{/typed}}).user;
    if (!defineAbilityFor(user).can(action, subject)) {
      res.status(403).json({ message: 'Forbidden' });
      return;
    }
    next();
  };
}
{{#untyped}}

module.exports = { authorize };
{{/untyped}}
"#;

const ROLE_MIDDLEWARE: &str = r#"{{#typed}}
import { Request, Response, NextFunction, RequestHandler } from 'express';

{{/typed}}
{{#typed}}export {{/typed}}function requireRole(...roles{{#typed}}: string[]{{/typed}}){{#typed}}: RequestHandler{{/typed}} {
  return (req{{#typed}}: Request{{/typed}}, res{{#typed}}: Response{{/typed}}, next{{#typed}}: NextFunction{{/typed}}) => {
    const role = (req{{#typed}} as Request & { user?: { role?: string } }{{/typed}}).user?.role;
    if (!role || !roles.includes(role)) {
      res.status(403).json({ message: 'Insufficient role' });
      return;
    }
    next();
  };
}
{{#untyped}}

module.exports = { requireRole };
{{/untyped}}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Dialect;

    fn options(dialect: Dialect) -> OptionRecord {
        OptionRecord::builder()
            .dialect(dialect)
            .auth(true)
            .authorization(true)
            .roles(true)
            .build()
            .unwrap()
    }

    #[test]
    fn auth_emits_config_middleware_and_token_utils() {
        let output = generate_auth(&options(Dialect::Typed)).unwrap();
        assert_eq!(
            output.artifacts.paths(),
            vec![
                "src/config/auth.ts",
                "src/middleware/auth.middleware.ts",
                "src/utils/token.ts"
            ]
        );
        assert_eq!(output.patch.dependencies["jsonwebtoken"], "^9.0.2");
        assert!(output.patch.dev_dependencies.contains_key("@types/jsonwebtoken"));
    }

    #[test]
    fn untyped_auth_has_no_typings() {
        let output = generate_auth(&options(Dialect::Untyped)).unwrap();
        assert!(output.patch.dev_dependencies.is_empty());
        let middleware = output.artifacts.iter().nth(1).unwrap().content();
        assert!(middleware.contains("module.exports = { authenticate };"));
        assert!(!middleware.contains("AuthenticatedRequest"));
    }

    #[test]
    fn authorization_does_not_import_auth_files() {
        let output = generate_authorization(&options(Dialect::Typed)).unwrap();
        for artifact in &output.artifacts {
            assert!(!artifact.content().contains("utils/token"));
            assert!(!artifact.content().contains("config/auth'"));
        }
        assert_eq!(output.patch.dependencies["@casl/ability"], "^6.7.2");
    }

    #[test]
    fn roles_has_no_dependencies() {
        let output = generate_roles(&options(Dialect::Untyped)).unwrap();
        assert_eq!(
            output.artifacts.paths(),
            vec!["src/middleware/role.middleware.js"]
        );
        assert!(output.patch.is_empty());
    }
}
