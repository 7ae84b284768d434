//! Demo applications.
//!
//! `todo` and `blog` are CRUD domains built from the schematic templates;
//! `weather` proxies a public forecast API.

use super::FeatureOutput;
use crate::domain::{
    entities::{ManifestPatch, OptionRecord},
    error::DomainError,
    naming::NameConvention,
    rendering::RenderContext,
    schematics,
    value_objects::{ArtifactKind, DemoKind, FeatureKind, SchematicKind},
};

/// Kinds a CRUD demo is made of.
const CRUD_DEMO_KINDS: [SchematicKind; 4] = [
    SchematicKind::Controller,
    SchematicKind::Service,
    SchematicKind::Route,
    SchematicKind::Model,
];

pub(super) fn generate(options: &OptionRecord) -> Result<FeatureOutput, DomainError> {
    match options.demo() {
        DemoKind::Weather => weather(options),
        DemoKind::Todo => crud(options, "todo"),
        DemoKind::Blog => crud(options, "post"),
        DemoKind::None => Err(DomainError::FeatureNotConfigured {
            feature: FeatureKind::Demo.to_string(),
            reason: "no demo selected".into(),
        }),
    }
}

fn crud(options: &OptionRecord, entity: &str) -> Result<FeatureOutput, DomainError> {
    let naming = NameConvention::parse(entity);
    let mut output = FeatureOutput::new();
    for kind in CRUD_DEMO_KINDS {
        output
            .artifacts
            .push(schematics::render(kind, &naming, options.dialect())?)?;
    }
    Ok(output)
}

fn weather(options: &OptionRecord) -> Result<FeatureOutput, DomainError> {
    let ctx = RenderContext::new(options.dialect());
    let mut output = FeatureOutput::new();

    output.emit(
        "src/services/weather.service.{{EXT}}",
        WEATHER_SERVICE,
        &ctx,
        ArtifactKind::Schematic(SchematicKind::Service),
    )?;
    output.emit(
        "src/controllers/weather.controller.{{EXT}}",
        WEATHER_CONTROLLER,
        &ctx,
        ArtifactKind::Schematic(SchematicKind::Controller),
    )?;
    output.emit(
        "src/routes/weather.routes.{{EXT}}",
        WEATHER_ROUTES,
        &ctx,
        ArtifactKind::Schematic(SchematicKind::Route),
    )?;
    output.patch = ManifestPatch::new().dependency("axios", "^1.7.9");

    Ok(output)
}

const WEATHER_SERVICE: &str = r#"{{#typed}}
import axios from 'axios';

export interface CurrentWeather {
  temperature: number;
  windspeed: number;
  weathercode: number;
  time: string;
}
{{/typed}}
{{#untyped}}
const axios = require('axios');
{{/untyped}}

const API_URL = process.env.WEATHER_API_URL ?? 'https://api.open-meteo.com/v1/forecast';

{{#typed}}export {{/typed}}class WeatherService {
  async current(latitude{{#typed}}: number{{/typed}}, longitude{{#typed}}: number{{/typed}}){{#typed}}: Promise<CurrentWeather>{{/typed}} {
    const { data } = await axios.get(API_URL, {
      params: { latitude, longitude, current_weather: true },
    });
    return data.current_weather;
  }
}
{{#untyped}}

module.exports = { WeatherService };
{{/untyped}}
"#;

const WEATHER_CONTROLLER: &str = r#"{{#typed}}
import { Request, Response, NextFunction } from 'express';
import { WeatherService } from '../services/weather.service';
{{/typed}}
{{#untyped}}
const { WeatherService } = require('../services/weather.service');
{{/untyped}}

{{#typed}}export {{/typed}}class WeatherController {
  {{#typed}}private readonly {{/typed}}service = new WeatherService();

  current = async (req{{#typed}}: Request{{/typed}}, res{{#typed}}: Response{{/typed}}, next{{#typed}}: NextFunction{{/typed}}) => {
    const latitude = Number(req.query.lat ?? 52.52);
    const longitude = Number(req.query.lon ?? 13.41);
    if (Number.isNaN(latitude) || Number.isNaN(longitude)) {
      res.status(400).json({ message: 'lat and lon must be numbers' });
      return;
    }

    try {
      res.json(await this.service.current(latitude, longitude));
    } catch (err) {
      next(err);
    }
  };
}
{{#untyped}}

module.exports = { WeatherController };
{{/untyped}}
"#;

const WEATHER_ROUTES: &str = r#"{{#typed}}
import { Router } from 'express';
import { WeatherController } from '../controllers/weather.controller';
{{/typed}}
{{#untyped}}
const { Router } = require('express');
const { WeatherController } = require('../controllers/weather.controller');
{{/untyped}}

const controller = new WeatherController();

// kiln:wire mount in src/routes/index with router.use('/weather', weatherRouter)
{{#typed}}export {{/typed}}const weatherRouter = Router();

weatherRouter.get('/', controller.current);
{{#untyped}}

module.exports = { weatherRouter };
{{/untyped}}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Dialect;

    fn demo(kind: DemoKind, dialect: Dialect) -> FeatureOutput {
        let options = OptionRecord::builder()
            .dialect(dialect)
            .demo(kind)
            .build()
            .unwrap();
        generate(&options).unwrap()
    }

    #[test]
    fn weather_pulls_in_axios() {
        let output = demo(DemoKind::Weather, Dialect::Typed);
        assert_eq!(
            output.artifacts.paths(),
            vec![
                "src/services/weather.service.ts",
                "src/controllers/weather.controller.ts",
                "src/routes/weather.routes.ts"
            ]
        );
        assert_eq!(output.patch.dependencies["axios"], "^1.7.9");
    }

    #[test]
    fn todo_reuses_schematic_templates() {
        let output = demo(DemoKind::Todo, Dialect::Untyped);
        assert_eq!(
            output.artifacts.paths(),
            vec![
                "src/controllers/todo.controller.js",
                "src/services/todo.service.js",
                "src/routes/todo.routes.js",
                "src/models/todo.model.js"
            ]
        );
        assert!(output.patch.is_empty());
    }

    #[test]
    fn blog_is_built_around_posts() {
        let output = demo(DemoKind::Blog, Dialect::Typed);
        assert!(output
            .artifacts
            .paths()
            .contains(&"src/controllers/post.controller.ts"));
    }

    #[test]
    fn none_is_not_configured() {
        let err = generate(&OptionRecord::default()).unwrap_err();
        assert!(matches!(err, DomainError::FeatureNotConfigured { .. }));
    }
}
