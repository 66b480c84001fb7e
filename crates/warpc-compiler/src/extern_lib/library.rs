//! Linked external libraries and symbol lookup.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::Error;

/// A linked library artifact.
///
/// A file-backed library is memory-mapped and searched for the symbol name
/// as a whole word, which works for bitcode and object files alike without
/// parsing either format.
#[derive(Debug)]
pub struct ExternLibrary {
    name: String,
    contents: Contents,
}

#[derive(Debug)]
enum Contents {
    Symbols(BTreeSet<String>),
    Mapped { path: PathBuf, map: Mmap },
    Empty { path: PathBuf },
}

impl ExternLibrary {
    /// In-memory library exporting exactly `symbols`.
    pub fn from_symbols<I, S>(name: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            contents: Contents::Symbols(symbols.into_iter().map(Into::into).collect()),
        }
    }

    /// Map the library file at `path`.
    pub fn open(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, Error> {
        let name = name.into();
        let path = path.as_ref().to_path_buf();
        let io_err = |e: std::io::Error| Error::Library {
            name: name.clone(),
            path: path.clone(),
            message: e.to_string(),
        };

        let file = File::open(&path).map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();
        let contents = if len == 0 {
            Contents::Empty { path }
        } else {
            // SAFETY: the mapping is read-only and lives as long as `self`;
            // the library file is not expected to change during compilation.
            let map = unsafe { Mmap::map(&file) }.map_err(io_err)?;
            Contents::Mapped { path, map }
        };
        Ok(Self { name, contents })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.contents {
            Contents::Symbols(_) => None,
            Contents::Mapped { path, .. } | Contents::Empty { path } => Some(path),
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        match &self.contents {
            Contents::Symbols(set) => set.contains(symbol),
            Contents::Mapped { map, .. } => contains_word(map, symbol.as_bytes()),
            Contents::Empty { .. } => false,
        }
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.')
}

/// `needle` occurs in `haystack` not surrounded by identifier bytes.
fn contains_word(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .enumerate()
        .any(|(start, window)| {
            if window != needle {
                return false;
            }
            let end = start + needle.len();
            let before = start.checked_sub(1).map(|i| haystack[i]);
            let after = haystack.get(end).copied();
            !before.is_some_and(is_ident_byte) && !after.is_some_and(is_ident_byte)
        })
}

/// Libraries linked into one compilation, by namespace.
#[derive(Debug, Default)]
pub struct LinkedLibraries {
    libraries: BTreeMap<String, ExternLibrary>,
}

impl LinkedLibraries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `library` under its own name, replacing any previous one.
    pub fn link(&mut self, library: ExternLibrary) {
        self.libraries.insert(library.name.clone(), library);
    }

    pub fn get(&self, name: &str) -> Option<&ExternLibrary> {
        self.libraries.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.libraries.keys().map(String::as_str)
    }
}
