//! Infrastructure adapters for Kiln.
//!
//! This crate implements the ports defined in `kiln-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod base_template;
pub mod filesystem;

// Re-export commonly used adapters
pub use base_template::{BuiltinTemplate, GitTemplate};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
