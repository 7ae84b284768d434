//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `kiln-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `BaseTemplateSource`: Populates a fresh project before features run
//!
//! - **Driving (Input) Ports**: the services themselves, called by `kiln-cli`

pub mod output;

pub use output::{BaseTemplateSource, Filesystem};

#[cfg(test)]
pub use output::{MockBaseTemplateSource, MockFilesystem};
