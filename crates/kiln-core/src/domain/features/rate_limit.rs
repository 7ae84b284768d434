//! Request rate limiting with a memory or redis store.

use super::FeatureOutput;
use crate::domain::{
    entities::{ManifestPatch, OptionRecord},
    error::DomainError,
    rendering::RenderContext,
    value_objects::{ArtifactKind, FeatureKind, SchematicKind},
};

pub(super) fn generate(options: &OptionRecord) -> Result<FeatureOutput, DomainError> {
    let store = options
        .rate_limit()
        .ok_or_else(|| DomainError::FeatureNotConfigured {
            feature: FeatureKind::RateLimit.to_string(),
            reason: "rate limiting is off".into(),
        })?;

    let ctx = RenderContext::new(options.dialect())
        .with_variable("STORE", store.as_str())
        .with_flag("redis", store.is_distributed());
    let mut output = FeatureOutput::new();

    output.emit(
        "src/config/rate-limit.{{EXT}}",
        CONFIG,
        &ctx,
        ArtifactKind::Config,
    )?;
    output.emit(
        "src/middleware/rate-limit.middleware.{{EXT}}",
        MIDDLEWARE,
        &ctx,
        ArtifactKind::Schematic(SchematicKind::Middleware),
    )?;

    let patch = ManifestPatch::new().dependency("express-rate-limit", "^7.4.1");
    output.patch = if store.is_distributed() {
        patch
            .dependency("rate-limit-redis", "^4.2.0")
            .dependency("redis", "^4.7.0")
    } else {
        patch
    };

    Ok(output)
}

const CONFIG: &str = r#"{{#typed}}export {{/typed}}const rateLimitConfig = {
  windowMs: Number(process.env.RATE_LIMIT_WINDOW_MS ?? 15 * 60 * 1000),
  max: Number(process.env.RATE_LIMIT_MAX ?? 100),
  store: '{{STORE}}',
{{#redis}}
  redisUrl: process.env.REDIS_URL ?? 'redis://localhost:6379',
{{/redis}}
};
{{#untyped}}

module.exports = { rateLimitConfig };
{{/untyped}}
"#;

const MIDDLEWARE: &str = r#"{{#typed}}
import rateLimit from 'express-rate-limit';
{{#redis}}
import { RedisStore } from 'rate-limit-redis';
import { createClient } from 'redis';
{{/redis}}
import { rateLimitConfig } from '../config/rate-limit';
{{/typed}}
{{#untyped}}
const { rateLimit } = require('express-rate-limit');
{{#redis}}
const { RedisStore } = require('rate-limit-redis');
const { createClient } = require('redis');
{{/redis}}
const { rateLimitConfig } = require('../config/rate-limit');
{{/untyped}}
{{#redis}}

const redisClient = createClient({ url: rateLimitConfig.redisUrl });
redisClient.connect().catch((err{{#typed}}: Error{{/typed}}) => console.error('redis connection failed', err));
{{/redis}}

// kiln:wire register with app.use(rateLimiter)
{{#typed}}export {{/typed}}const rateLimiter = rateLimit({
  windowMs: rateLimitConfig.windowMs,
  limit: rateLimitConfig.max,
  standardHeaders: 'draft-7',
  legacyHeaders: false,
{{#redis}}
  store: new RedisStore({
    sendCommand: (...args{{#typed}}: string[]{{/typed}}) => redisClient.sendCommand(args),
  }),
{{/redis}}
});
{{#untyped}}

module.exports = { rateLimiter };
{{/untyped}}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Dialect, RateLimitStore};

    #[test]
    fn memory_store_needs_only_express_rate_limit() {
        let options = OptionRecord::builder()
            .rate_limit(Some(RateLimitStore::Memory))
            .build()
            .unwrap();
        let output = generate(&options).unwrap();
        assert_eq!(output.patch.dependencies.len(), 1);
        let middleware = output.artifacts.iter().nth(1).unwrap().content();
        assert!(!middleware.contains("RedisStore"));
    }

    #[test]
    fn redis_store_is_distributed() {
        let options = OptionRecord::builder()
            .dialect(Dialect::Untyped)
            .rate_limit(Some(RateLimitStore::Redis))
            .build()
            .unwrap();
        let output = generate(&options).unwrap();
        assert!(output.patch.dependencies.contains_key("rate-limit-redis"));
        assert!(output.patch.dependencies.contains_key("redis"));
        let middleware = output.artifacts.iter().nth(1).unwrap().content();
        assert!(middleware.contains("store: new RedisStore({"));
        assert!(middleware.contains("const { RedisStore } = require('rate-limit-redis');"));
    }

    #[test]
    fn disabled_is_not_configured() {
        assert!(generate(&OptionRecord::default()).is_err());
    }
}
