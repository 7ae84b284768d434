//! Schematic generation.
//!
//! `generate(kind, name, dialect)` renders the template for `kind`, or the
//! whole resource fan-out for [`SchematicKind::Resource`]. Pure: writing the
//! result is the application layer's job.

pub mod templates;

use crate::domain::{
    entities::{Artifact, ArtifactSet},
    error::DomainError,
    naming::NameConvention,
    rendering::RenderContext,
    validation::DomainValidator,
    value_objects::{ArtifactKind, Dialect, SchematicKind},
};

/// Kinds a resource expands to, in output order.
///
/// `Interface` is skipped under the untyped dialect.
pub const RESOURCE_FANOUT: [SchematicKind; 6] = [
    SchematicKind::Controller,
    SchematicKind::Service,
    SchematicKind::Route,
    SchematicKind::Model,
    SchematicKind::Interface,
    SchematicKind::Test,
];

pub fn generate(
    kind: SchematicKind,
    name: &str,
    dialect: Dialect,
) -> Result<ArtifactSet, DomainError> {
    DomainValidator::validate_name(name)?;

    let mut set = ArtifactSet::new();
    match kind {
        SchematicKind::Resource => {
            let naming = NameConvention::for_resource(name);
            for member in RESOURCE_FANOUT {
                if member == SchematicKind::Interface && !dialect.is_typed() {
                    continue;
                }
                set.push(render(member, &naming, dialect)?)?;
            }
        }
        SchematicKind::Interface if !dialect.is_typed() => {
            return Err(DomainError::DialectMismatch {
                requested: kind.to_string(),
                required: Dialect::Typed.to_string(),
            });
        }
        _ => {
            let naming = NameConvention::for_role(name, kind);
            set.push(render(kind, &naming, dialect)?)?;
        }
    }

    Ok(set)
}

/// Render a single non-composite schematic.
pub fn render(
    kind: SchematicKind,
    naming: &NameConvention,
    dialect: Dialect,
) -> Result<Artifact, DomainError> {
    let template = templates::find(kind)
        .ok_or_else(|| DomainError::InvalidSchematic(kind.to_string()))?;
    let ctx = context(naming, dialect);

    Artifact::new(
        &template.path(&naming.file_stem(), dialect),
        ctx.render(template.template),
        ArtifactKind::Schematic(kind),
        dialect,
    )
}

/// Render context carrying every sibling identifier of a resource.
pub fn context(naming: &NameConvention, dialect: Dialect) -> RenderContext {
    RenderContext::new(dialect)
        .with_name(naming)
        .with_variable("CONTROLLER_NAME", naming.type_name_with("Controller"))
        .with_variable("SERVICE_NAME", naming.type_name_with("Service"))
        .with_variable("MIDDLEWARE_NAME", naming.camel_name_with("Middleware"))
        .with_variable("ROUTER_NAME", naming.camel_name_with("Router"))
        .with_variable("MODEL_NAME", naming.type_name())
        .with_variable("INTERFACE_NAME", format!("I{}", naming.type_name()))
}
