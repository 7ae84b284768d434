//! Base template sources for `kiln new`.

mod builtin;
mod git;

pub use builtin::BuiltinTemplate;
pub use git::GitTemplate;
