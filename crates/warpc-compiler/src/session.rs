//! Compilation session: configured registry and linked libraries.

use std::path::PathBuf;
use std::sync::Arc;

use crate::check::{TypeChecker, TypedExpr};
use crate::diagnostics::Diagnostics;
use crate::extern_lib::{ExternLibrary, LinkedLibraries, SignatureRegistry};
use crate::options::CompilerOptions;
use crate::parser::parse;
use crate::{Error, Result};

/// A probe that parsed and type checked.
#[derive(Debug, Clone)]
pub struct Checked {
    pub expr: TypedExpr,
    /// Warnings only; errors make the check fail.
    pub diagnostics: Diagnostics,
}

/// Immutable after construction; check probes from several threads by
/// giving each its own [`TypeChecker`].
#[derive(Debug)]
pub struct Session {
    registry: Arc<SignatureRegistry>,
    libraries: LinkedLibraries,
}

#[derive(Debug, Default)]
pub struct SessionBuilder {
    options: CompilerOptions,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn extern_lib(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.options = self.options.extern_lib(name, path);
        self
    }

    pub fn registry(mut self, registry: impl Into<Arc<SignatureRegistry>>) -> Self {
        self.options = self.options.registry(registry);
        self
    }

    pub fn assume_linked(mut self, value: bool) -> Self {
        self.options = self.options.assume_linked(value);
        self
    }

    /// Load the configured libraries.
    pub fn build(self) -> Result<Session> {
        let registry = Arc::clone(self.options.signature_registry());
        let mut libraries = LinkedLibraries::new();

        if self.options.is_assume_linked() {
            for name in registry.libraries() {
                libraries.link(ExternLibrary::from_symbols(name, registry.symbols(name)));
            }
        }
        for (name, path) in self.options.extern_libs() {
            libraries.link(ExternLibrary::open(name.as_str(), path)?);
        }

        Ok(Session {
            registry,
            libraries,
        })
    }
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn new(options: CompilerOptions) -> Result<Self> {
        SessionBuilder::new().options(options).build()
    }

    pub fn registry(&self) -> &SignatureRegistry {
        &self.registry
    }

    pub fn libraries(&self) -> &LinkedLibraries {
        &self.libraries
    }

    /// A checker whose call cache lives as long as it does.
    pub fn checker(&self) -> TypeChecker<'_> {
        TypeChecker::new(&self.registry, &self.libraries)
    }

    /// Parse and check one probe.
    pub fn check(&self, source: &str) -> Result<Checked> {
        check_with(&mut self.checker(), source)
    }

    /// Check every non-blank line of `source` as its own probe, sharing one
    /// call cache. Diagnostic ranges are relative to `source`.
    pub fn check_lines<'s>(&self, source: &'s str) -> Vec<(&'s str, Result<Checked>)> {
        let mut checker = self.checker();
        let mut out = Vec::new();
        let mut offset = 0;
        for line in source.split_inclusive('\n') {
            let start = offset;
            offset += line.len();
            let text = line.trim_end_matches(['\n', '\r']);
            if text.trim().is_empty() {
                continue;
            }
            let result = check_with(&mut checker, text).map_err(|e| shift(e, start));
            out.push((text, result.map(|c| shift_checked(c, start))));
        }
        out
    }
}

fn check_with(checker: &mut TypeChecker<'_>, source: &str) -> Result<Checked> {
    let parsed = parse(source);
    let Some(expr) = parsed.expr else {
        return Err(Error::Parse(parsed.diagnostics));
    };
    let checked = checker.check(&expr);
    match checked.typed {
        Some(expr) => Ok(Checked {
            expr,
            diagnostics: checked.diagnostics,
        }),
        None => Err(Error::Check(checked.diagnostics)),
    }
}

fn shift(error: Error, by: usize) -> Error {
    match error {
        Error::Parse(d) => Error::Parse(d.shifted(by)),
        Error::Check(d) => Error::Check(d.shifted(by)),
        other => other,
    }
}

fn shift_checked(checked: Checked, by: usize) -> Checked {
    Checked {
        diagnostics: checked.diagnostics.shifted(by),
        ..checked
    }
}
