//! Overload resolution for external calls.
//!
//! Resolution is first-match over the `(name, arity)` candidates: an exact
//! dtype match wins outright; otherwise the narrowest overload accepting the
//! arguments after float widening is chosen, ties going to the earlier
//! registration. The chosen symbol must then be present in its linked
//! library. Either step failing fails the call; nothing is bound partially.

use std::collections::HashMap;

use serde::Serialize;
use warpc_core::Dtype;

use super::library::LinkedLibraries;
use super::registry::{SignatureId, SignatureRegistry};
use crate::error::CompileError;

/// A call bound to a concrete external symbol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedCall {
    #[serde(skip)]
    pub signature: SignatureId,
    pub library: String,
    pub name: String,
    pub symbol: String,
    /// Parameter dtypes of the chosen overload.
    pub params: Vec<Dtype>,
    pub ret: Dtype,
    /// Whether any argument was widened to reach `params`.
    pub widened: bool,
}

/// Choose the overload of `name` for `args`.
///
/// `library` restricts candidates to one namespace (`libdevice.pow`).
pub fn select_overload(
    registry: &SignatureRegistry,
    library: Option<&str>,
    name: &str,
    args: &[Dtype],
) -> Result<SignatureId, CompileError> {
    let candidates: Vec<_> = registry
        .candidates(name, args.len())
        .filter(|(_, sig)| library.is_none_or(|lib| sig.library == lib))
        .collect();

    if let Some((id, _)) = candidates.iter().find(|(_, sig)| sig.accepts_exact(args)) {
        return Ok(*id);
    }

    // `min_by_key` keeps the first of equal minima: registration order.
    candidates
        .iter()
        .filter(|(_, sig)| sig.accepts_widened(args))
        .min_by_key(|(_, sig)| sig.total_width())
        .map(|(id, _)| *id)
        .ok_or_else(|| CompileError::UnresolvedOverload {
            name: qualified(library, name),
            args: args.iter().map(|&d| d.into()).collect(),
        })
}

/// Resolve a call and locate its symbol. Pure; safe to run concurrently
/// against a shared registry.
pub fn resolve_call(
    registry: &SignatureRegistry,
    libraries: &LinkedLibraries,
    library: Option<&str>,
    name: &str,
    args: &[Dtype],
) -> Result<ResolvedCall, CompileError> {
    let id = select_overload(registry, library, name, args)?;
    let sig = registry.get(id);
    let symbol = sig.symbol();

    let found = libraries
        .get(&sig.library)
        .is_some_and(|lib| lib.contains(&symbol));
    if !found {
        return Err(CompileError::MissingExternalSymbol {
            symbol,
            library: sig.library.clone(),
        });
    }

    Ok(ResolvedCall {
        signature: id,
        library: sig.library.clone(),
        name: sig.name.clone(),
        symbol,
        params: sig.args.clone(),
        ret: sig.ret,
        widened: !sig.accepts_exact(args),
    })
}

fn qualified(library: Option<&str>, name: &str) -> String {
    match library {
        Some(lib) => format!("{lib}.{name}"),
        None => name.to_owned(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CallKey {
    library: Option<String>,
    name: String,
    args: Vec<Dtype>,
}

/// Resolution results per distinct call signature, for one compilation.
#[derive(Debug, Default)]
pub struct DispatchCache {
    entries: HashMap<CallKey, Result<ResolvedCall, CompileError>>,
    hits: usize,
}

impl DispatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct call signatures resolved.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered without resolving again.
    pub fn hits(&self) -> usize {
        self.hits
    }
}

/// Resolves extern calls for one compilation, memoizing per call signature.
pub struct Dispatcher<'c> {
    registry: &'c SignatureRegistry,
    libraries: &'c LinkedLibraries,
    cache: DispatchCache,
}

impl<'c> Dispatcher<'c> {
    pub fn new(registry: &'c SignatureRegistry, libraries: &'c LinkedLibraries) -> Self {
        Self {
            registry,
            libraries,
            cache: DispatchCache::new(),
        }
    }

    pub fn registry(&self) -> &'c SignatureRegistry {
        self.registry
    }

    pub fn resolve(
        &mut self,
        library: Option<&str>,
        name: &str,
        args: &[Dtype],
    ) -> Result<ResolvedCall, CompileError> {
        let key = CallKey {
            library: library.map(str::to_owned),
            name: name.to_owned(),
            args: args.to_vec(),
        };
        if let Some(hit) = self.cache.entries.get(&key) {
            self.cache.hits += 1;
            return hit.clone();
        }
        let result = resolve_call(self.registry, self.libraries, library, name, args);
        self.cache.entries.insert(key, result.clone());
        result
    }

    pub fn cache(&self) -> &DispatchCache {
        &self.cache
    }
}
