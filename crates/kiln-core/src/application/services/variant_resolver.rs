//! Variant Resolver - reads a project's dialect from its marker file.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::{application::ports::Filesystem, domain::Dialect};

pub struct VariantResolver {
    filesystem: Arc<dyn Filesystem>,
}

impl VariantResolver {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Typed when `tsconfig.json` sits at `root`, untyped otherwise.
    pub fn resolve(&self, root: &Path) -> Dialect {
        let marked = self.filesystem.exists(&root.join(Dialect::MARKER_FILE));
        let dialect = Dialect::from_marker(marked);
        debug!(root = %root.display(), %dialect, "dialect resolved");
        dialect
    }
}
