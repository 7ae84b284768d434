//! Kiln Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Kiln
//! backend-service scaffolder, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            kiln-cli (CLI)               │
//! │      (new, generate, add, list)         │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Application Services           │
//! │ (Scaffold, Schematic, Feature, Manifest)│
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │   (Filesystem, BaseTemplateSource)      │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     kiln-adapters (Infrastructure)      │
//! │ (LocalFilesystem, BuiltinTemplate, Git) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (OptionRecord, schematics, features)    │
//! │          No I/O, no logging             │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::{path::Path, sync::Arc};
//! use kiln_core::prelude::*;
//!
//! # fn run(fs: Arc<dyn Filesystem>, base: Arc<dyn BaseTemplateSource>) -> KilnResult<()> {
//! let options = OptionRecord::builder()
//!     .dialect(Dialect::Typed)
//!     .persistence(PersistenceBackend::Postgres)
//!     .auth(true)
//!     .build()?;
//!
//! let service = ScaffoldService::new(fs, base);
//! let report = service.scaffold("orders-api", Path::new("./orders-api"), &options)?;
//! println!("{} files", report.artifacts.len());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CatalogService, FeatureService, ScaffoldReport, ScaffoldService, SchematicService,
        WritePolicy,
        ports::{BaseTemplateSource, Filesystem},
    };
    pub use crate::domain::{
        Artifact, DataAccess, DataAccessChoice, DemoKind, Dialect, FeatureKind, MessagingBackend,
        MonitoringTool, OptionRecord, PersistenceBackend, RateLimitStore, SchematicKind,
    };
    pub use crate::error::{KilnError, KilnResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
