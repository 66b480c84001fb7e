//! The signature registry.
//!
//! Signatures are registered once at startup through a [`RegistryBuilder`]
//! and frozen into a [`SignatureRegistry`]. The frozen registry is never
//! mutated, so it can be shared across compiling threads behind an `Arc`.
//! Signatures are stored in an arena and referenced by [`SignatureId`].

use std::collections::BTreeSet;

use indexmap::IndexMap;
use warpc_core::Dtype;

use super::signature::ExternSignature;

/// Handle to a signature in a [`SignatureRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignatureId(u32);

impl SignatureId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Overloads keyed by `(name, arity)`, each list in registration order.
type OverloadIndex = IndexMap<(String, usize), Vec<SignatureId>>;

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    signatures: Vec<ExternSignature>,
    index: OverloadIndex,
    version: u32,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the registry version.
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Register one overload. Registering an identical signature again
    /// returns the existing handle.
    pub fn register(&mut self, sig: ExternSignature) -> SignatureId {
        let key = (sig.name.clone(), sig.arity());
        let ids = self.index.entry(key).or_default();
        if let Some(&id) = ids.iter().find(|id| self.signatures[id.index()] == sig) {
            return id;
        }
        let id = SignatureId(self.signatures.len() as u32);
        self.signatures.push(sig);
        ids.push(id);
        id
    }

    /// Chaining form of [`register`](Self::register).
    pub fn signature(mut self, sig: ExternSignature) -> Self {
        self.register(sig);
        self
    }

    /// Register every overload of `name` in `library`, one per `(args, ret)`.
    pub fn overloads(
        mut self,
        library: &str,
        name: &str,
        symbol_template: &str,
        overloads: &[(&[Dtype], Dtype)],
    ) -> Self {
        for (args, ret) in overloads {
            self.register(ExternSignature::new(
                library,
                name,
                symbol_template,
                args.to_vec(),
                *ret,
            ));
        }
        self
    }

    /// Add all signatures of another registry, keeping their order.
    pub fn extend(mut self, other: &SignatureRegistry) -> Self {
        for sig in other.iter().map(|(_, s)| s) {
            self.register(sig.clone());
        }
        self
    }

    pub fn build(self) -> SignatureRegistry {
        let fingerprint = fingerprint(self.version, &self.signatures);
        SignatureRegistry {
            signatures: self.signatures,
            index: self.index,
            version: self.version,
            fingerprint,
        }
    }
}

/// Frozen, read-only signature table.
#[derive(Debug, Clone)]
pub struct SignatureRegistry {
    signatures: Vec<ExternSignature>,
    index: OverloadIndex,
    version: u32,
    fingerprint: u32,
}

impl SignatureRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Panics if `id` was issued by another registry.
    pub fn get(&self, id: SignatureId) -> &ExternSignature {
        &self.signatures[id.index()]
    }

    /// Overloads of `name` with `arity` parameters, in registration order.
    pub fn candidates(
        &self,
        name: &str,
        arity: usize,
    ) -> impl Iterator<Item = (SignatureId, &ExternSignature)> + '_ {
        self.index
            .get(&(name.to_owned(), arity))
            .into_iter()
            .flatten()
            .map(|&id| (id, self.get(id)))
    }

    /// Whether any overload of `name` exists, at any arity.
    pub fn contains_name(&self, name: &str) -> bool {
        self.index.keys().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SignatureId, &ExternSignature)> + '_ {
        self.signatures
            .iter()
            .enumerate()
            .map(|(i, s)| (SignatureId(i as u32), s))
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// CRC32 over the version and every signature, in registration order.
    pub fn fingerprint(&self) -> u32 {
        self.fingerprint
    }

    /// Distinct library namespaces.
    pub fn libraries(&self) -> BTreeSet<&str> {
        self.signatures.iter().map(|s| s.library.as_str()).collect()
    }

    /// Every symbol the registry can resolve to in `library`.
    pub fn symbols(&self, library: &str) -> BTreeSet<String> {
        self.signatures
            .iter()
            .filter(|s| s.library == library)
            .map(ExternSignature::symbol)
            .collect()
    }
}

fn fingerprint(version: u32, signatures: &[ExternSignature]) -> u32 {
    let mut bytes = version.to_le_bytes().to_vec();
    for sig in signatures {
        for part in [&sig.library, &sig.name, &sig.symbol_template] {
            bytes.extend_from_slice(part.as_bytes());
            bytes.push(0);
        }
        for arg in &sig.args {
            bytes.extend_from_slice(arg.name().as_bytes());
            bytes.push(b',');
        }
        bytes.extend_from_slice(sig.ret.name().as_bytes());
        bytes.push(b'\n');
    }
    crc32fast::hash(&bytes)
}
