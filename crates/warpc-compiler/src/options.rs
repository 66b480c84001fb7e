//! Compiler configuration.

use std::path::PathBuf;
use std::sync::Arc;

use crate::extern_lib::{SignatureRegistry, libdevice};

/// Options for one compilation session.
///
/// Defaults: the built-in libdevice registry and no linked libraries.
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    registry: Arc<SignatureRegistry>,
    extern_libs: Vec<(String, PathBuf)>,
    assume_linked: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            registry: Arc::new(libdevice::registry()),
            extern_libs: Vec::new(),
            assume_linked: false,
        }
    }
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link the library file at `path` under the namespace `name`.
    pub fn extern_lib(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.extern_libs.push((name.into(), path.into()));
        self
    }

    /// Replace the signature table.
    pub fn registry(mut self, registry: impl Into<Arc<SignatureRegistry>>) -> Self {
        self.registry = registry.into();
        self
    }

    /// Treat every registered symbol as present in its library. File-backed
    /// libraries given with [`extern_lib`](Self::extern_lib) still take
    /// precedence for their namespace.
    pub fn assume_linked(mut self, value: bool) -> Self {
        self.assume_linked = value;
        self
    }

    pub fn signature_registry(&self) -> &Arc<SignatureRegistry> {
        &self.registry
    }

    pub fn extern_libs(&self) -> &[(String, PathBuf)] {
        &self.extern_libs
    }

    pub fn is_assume_linked(&self) -> bool {
        self.assume_linked
    }
}
