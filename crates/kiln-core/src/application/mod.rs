//! Application layer for Kiln.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService, SchematicService, FeatureService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer drives the domain layer and performs all I/O
//! through ports. Generation rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    CatalogService, FeatureApplication, FeatureInfo, FeatureService, ManifestService,
    ScaffoldPhase, ScaffoldPlan, ScaffoldReport, ScaffoldService, SchematicInfo,
    SchematicService, VariantResolver, WriteOutcome, WritePolicy, WrittenArtifact,
};

pub use ports::{BaseTemplateSource, Filesystem};

pub use error::ApplicationError;
