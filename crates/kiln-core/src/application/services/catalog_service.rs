//! Catalog Service - what `kiln list` shows.

use serde::Serialize;

use crate::domain::{
    Dialect, FEATURE_REGISTRY, SchematicKind,
    schematics::{RESOURCE_FANOUT, templates},
};

/// Information about a feature module for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureInfo {
    pub name: String,
    pub summary: String,
    pub enabled_by: String,
}

/// Information about a schematic for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchematicInfo {
    pub name: String,
    /// Output path pattern, or the fan-out for a composite.
    pub output: String,
    pub typed_only: bool,
}

pub struct CatalogService;

impl CatalogService {
    pub fn features() -> Vec<FeatureInfo> {
        FEATURE_REGISTRY
            .iter()
            .map(|def| FeatureInfo {
                name: def.kind.to_string(),
                summary: def.summary.to_string(),
                enabled_by: def.enabled_by.to_string(),
            })
            .collect()
    }

    pub fn schematics() -> Vec<SchematicInfo> {
        SchematicKind::ALL
            .iter()
            .map(|&kind| {
                let output = match templates::find(kind) {
                    Some(template) => template.path("{name}", Dialect::Typed).replace(".ts", ".{ext}"),
                    None => RESOURCE_FANOUT
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" + "),
                };
                SchematicInfo {
                    name: kind.to_string(),
                    output,
                    typed_only: kind == SchematicKind::Interface,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_feature_in_order() {
        let features = CatalogService::features();
        assert_eq!(features.len(), FEATURE_REGISTRY.len());
        assert_eq!(features[0].name, "persistence");
        assert_eq!(features.last().unwrap().name, "microservices");
    }

    #[test]
    fn schematic_paths_use_placeholders() {
        let schematics = CatalogService::schematics();
        let controller = schematics.iter().find(|s| s.name == "controller").unwrap();
        assert_eq!(controller.output, "src/controllers/{name}.controller.{ext}");

        let resource = schematics.iter().find(|s| s.name == "resource").unwrap();
        assert!(resource.output.starts_with("controller + service"));
    }
}
