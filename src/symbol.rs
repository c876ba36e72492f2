use std::sync::atomic::{AtomicU32, Ordering};

use lasso::{Spur, ThreadedRodeo};

/// A caller-side effect variable.
///
/// An `EffVar` is the identity the surrounding type system uses for a
/// variable across a whole compilation: an interned name, stable
/// across solves. The dense ids the solver works with are assigned per
/// call and mapped back through this identity.
pub type EffVar = Spur;

/// The source of effect variables.
///
/// Serves two roles: turning caller-chosen names into variables
/// (`var`) and minting variables no caller has named (`fresh`), the
/// way type inference does while traversing a program. The store is
/// thread-safe and meant to live for a whole compilation; nothing in
/// it is solve-local.
///
/// Names beginning with `?` are reserved for generated variables.
pub struct SymbolStore {
    names: ThreadedRodeo,
    next_fresh: AtomicU32,
}

impl SymbolStore {
    /// Create a store with no variables.
    pub fn new() -> Self {
        Self {
            names: ThreadedRodeo::new(),
            next_fresh: AtomicU32::new(0),
        }
    }

    /// The effect variable named `name`.
    ///
    /// The same name always yields the same variable, so this both
    /// creates and re-finds: a caller holding only the name can
    /// recover the variable's identity.
    pub fn var(&self, name: &str) -> EffVar {
        self.names.get_or_intern(name)
    }

    /// Mint a variable distinct from every named one.
    ///
    /// Generated names have the form `?eN` with a store-wide counter;
    /// the `?` prefix keeps them out of the caller namespace.
    pub fn fresh(&self) -> EffVar {
        let n = self.next_fresh.fetch_add(1, Ordering::Relaxed);
        self.names.get_or_intern(format!("?e{n}"))
    }

    /// The name of a variable, if this store created it.
    pub fn name(&self, var: EffVar) -> Option<&str> {
        self.names.try_resolve(&var)
    }

    /// Find the variable for a name without creating one.
    pub fn lookup(&self, name: &str) -> Option<EffVar> {
        self.names.get(name)
    }

    /// Number of distinct variables, named and fresh.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check whether no variable has been created yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for SymbolStore {
    fn default() -> Self {
        Self::new()
    }
}
