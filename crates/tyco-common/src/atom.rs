//! String interning for identifier deduplication.
//!
//! Generic parameter names, field names, and variant tags are compared for
//! equality far more often than they are printed. Interning them into a
//! single `u32` makes those comparisons pointer-cheap and keeps `TypeData`
//! small.

use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};

/// An interned string.
///
/// Equality and hashing are by id, not by content, so comparing two atoms
/// never touches the backing string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(u32);

impl Atom {
    /// The id this atom was assigned, for diagnostics and debug formatting.
    pub fn id(self) -> u32 {
        self.0
    }
}

/// A thread-safe string interner shared by every crate that needs to
/// compare names.
///
/// Cloning an `AtomInterner` clones the `Arc`, not the table: all clones
/// share the same backing storage.
#[derive(Clone, Default)]
pub struct AtomInterner {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    strings: Vec<Box<str>>,
    ids: FxHashMap<Box<str>, u32>,
}

impl AtomInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `s`, returning the existing atom if it was seen before.
    pub fn intern(&self, s: &str) -> Atom {
        if let Some(id) = self.inner.read().unwrap().ids.get(s) {
            return Atom(*id);
        }
        let mut inner = self.inner.write().unwrap();
        if let Some(id) = inner.ids.get(s) {
            return Atom(*id);
        }
        let id = inner.strings.len() as u32;
        let boxed: Box<str> = s.into();
        inner.strings.push(boxed.clone());
        inner.ids.insert(boxed, id);
        Atom(id)
    }

    /// Resolves an atom back to its string contents.
    ///
    /// Panics if `atom` was not produced by this interner, since that
    /// indicates a bug (atoms are not meant to cross interner instances).
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        let inner = self.inner.read().unwrap();
        Arc::from(&*inner.strings[atom.0 as usize])
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_string_interns_to_same_atom() {
        let interner = AtomInterner::new();
        let a = interner.intern("T");
        let b = interner.intern("T");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_strings_intern_to_distinct_atoms() {
        let interner = AtomInterner::new();
        let a = interner.intern("T");
        let b = interner.intern("U");
        assert_ne!(a, b);
    }

    #[test]
    fn resolve_round_trips() {
        let interner = AtomInterner::new();
        let atom = interner.intern("length");
        assert_eq!(&*interner.resolve(atom), "length");
    }

    #[test]
    fn shared_across_clones() {
        let interner = AtomInterner::new();
        let clone = interner.clone();
        let a = interner.intern("shared");
        let b = clone.intern("shared");
        assert_eq!(a, b);
    }
}
