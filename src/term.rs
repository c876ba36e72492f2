use hashbrown::HashMap;
use rustc_hash::{FxHashSet, FxHasher};
use smallvec::SmallVec;
use std::hash::BuildHasherDefault;

/// Index of an effect variable after interning.
/// Dense within one solve; never reused across solves.
pub type VarId = u32;

/// Unique identifier for a term in the term store.
/// The store hashconses, so id equality is structural equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(u32);

impl TermId {
    /// Get the raw u32 value (for debugging/display).
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// A Boolean formula over effect variables, in canonical form.
///
/// Canonical-form invariants (enforced by the smart constructors, never
/// checked after the fact):
/// - `Not(t)`: `t` is not `True`, `False`, or another `Not`.
/// - `And(ts)` / `Or(ts)`: at least two children; no child is the
///   identity, the annihilator, or the same connective; no duplicate
///   children.
///
/// `True` is Pure (the identity of ∧); `False` is Univ (the identity
/// of ∨).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    True,
    False,
    Var(VarId),
    Not(TermId),
    And(SmallVec<[TermId; 4]>),
    Or(SmallVec<[TermId; 4]>),
}

/// Hashconsing term store, local to one solve.
///
/// Guarantees:
/// - Structurally equal terms get the same TermId
/// - Every TermId handed out resolves to its term
/// - `True` and `False` are pre-interned so constant checks are id
///   comparisons
///
/// The store is single-threaded by design: a solve owns its store
/// exclusively, and term identity is never shared across solves.
pub struct TermStore {
    nodes: Vec<Term>,
    ids: HashMap<Term, TermId, BuildHasherDefault<FxHasher>>,
}

const TRUE_ID: TermId = TermId(0);
const FALSE_ID: TermId = TermId(1);

impl TermStore {
    /// Create a new store with the two constants pre-interned.
    pub fn new() -> Self {
        let mut store = Self {
            nodes: Vec::new(),
            ids: HashMap::default(),
        };
        let t = store.intern(Term::True);
        let f = store.intern(Term::False);
        debug_assert_eq!(t, TRUE_ID);
        debug_assert_eq!(f, FALSE_ID);
        store
    }

    /// Intern a term, returning its TermId.
    /// If the term already exists, returns the existing TermId.
    fn intern(&mut self, term: Term) -> TermId {
        if let Some(&id) = self.ids.get(&term) {
            return id;
        }
        let id = TermId(self.nodes.len() as u32);
        self.nodes.push(term.clone());
        self.ids.insert(term, id);
        id
    }

    /// The Pure constant (identity of ∧).
    pub fn tru(&self) -> TermId {
        TRUE_ID
    }

    /// The Univ constant (identity of ∨).
    pub fn fls(&self) -> TermId {
        FALSE_ID
    }

    /// Create a variable term.
    pub fn var(&mut self, index: VarId) -> TermId {
        self.intern(Term::Var(index))
    }

    /// Resolve a TermId to its term.
    ///
    /// Ids are only created by this store within one solve, so a
    /// dangling id is a programmer error and panics.
    pub fn resolve(&self, id: TermId) -> &Term {
        &self.nodes[id.0 as usize]
    }

    /// Check if a term is a variable, returning its index.
    pub fn is_var(&self, id: TermId) -> Option<VarId> {
        match self.resolve(id) {
            Term::Var(index) => Some(*index),
            _ => None,
        }
    }

    /// Complement with eager folding: `¬⊤ = ⊥`, `¬⊥ = ⊤`, `¬¬t = t`.
    pub fn mk_not(&mut self, t: TermId) -> TermId {
        if t == TRUE_ID {
            return FALSE_ID;
        }
        if t == FALSE_ID {
            return TRUE_ID;
        }
        if let Term::Not(inner) = self.resolve(t) {
            return *inner;
        }
        self.intern(Term::Not(t))
    }

    /// N-ary conjunction in canonical flat form.
    ///
    /// `⊥` annihilates, `⊤` drops, nested conjunctions flatten one
    /// level, duplicate children are absorbed (`t ∧ t = t`). An empty
    /// result is `⊤`; a singleton result is its only child.
    pub fn mk_and<I>(&mut self, ts: I) -> TermId
    where
        I: IntoIterator<Item = TermId>,
    {
        let mut flat: SmallVec<[TermId; 4]> = SmallVec::new();
        for t in ts {
            if t == FALSE_ID {
                return FALSE_ID;
            }
            if t == TRUE_ID {
                continue;
            }
            match self.resolve(t) {
                // Children of a canonical And are themselves canonical,
                // so one level of flattening suffices.
                Term::And(kids) => flat.extend(kids.iter().copied()),
                _ => flat.push(t),
            }
        }
        let mut uniq: SmallVec<[TermId; 4]> = SmallVec::with_capacity(flat.len());
        for t in flat {
            if !uniq.contains(&t) {
                uniq.push(t);
            }
        }
        match uniq.len() {
            0 => TRUE_ID,
            1 => uniq[0],
            _ => self.intern(Term::And(uniq)),
        }
    }

    /// Binary conjunction; see [`mk_and`](Self::mk_and).
    pub fn mk_and2(&mut self, a: TermId, b: TermId) -> TermId {
        self.mk_and([a, b])
    }

    /// N-ary disjunction in canonical flat form; dual of
    /// [`mk_and`](Self::mk_and): `⊤` annihilates, `⊥` drops, an empty
    /// result is `⊥`.
    pub fn mk_or<I>(&mut self, ts: I) -> TermId
    where
        I: IntoIterator<Item = TermId>,
    {
        let mut flat: SmallVec<[TermId; 4]> = SmallVec::new();
        for t in ts {
            if t == TRUE_ID {
                return TRUE_ID;
            }
            if t == FALSE_ID {
                continue;
            }
            match self.resolve(t) {
                Term::Or(kids) => flat.extend(kids.iter().copied()),
                _ => flat.push(t),
            }
        }
        let mut uniq: SmallVec<[TermId; 4]> = SmallVec::with_capacity(flat.len());
        for t in flat {
            if !uniq.contains(&t) {
                uniq.push(t);
            }
        }
        match uniq.len() {
            0 => FALSE_ID,
            1 => uniq[0],
            _ => self.intern(Term::Or(uniq)),
        }
    }

    /// Binary disjunction; see [`mk_or`](Self::mk_or).
    pub fn mk_or2(&mut self, a: TermId, b: TermId) -> TermId {
        self.mk_or([a, b])
    }

    /// Symmetric difference: `a ⊕ b ≡ (a ∧ ¬b) ∨ (¬a ∧ b)`.
    ///
    /// The solver's validity queries are phrased as `a ⊕ b ≡ ⊥`.
    pub fn mk_xor(&mut self, a: TermId, b: TermId) -> TermId {
        let not_b = self.mk_not(b);
        let not_a = self.mk_not(a);
        let left = self.mk_and2(a, not_b);
        let right = self.mk_and2(not_a, b);
        self.mk_or2(left, right)
    }

    /// Collect free variables in order of first appearance (unique).
    pub fn free_vars(&self, term: TermId) -> Vec<VarId> {
        let mut vars = Vec::new();
        let mut seen: FxHashSet<VarId> = FxHashSet::default();
        let mut stack: SmallVec<[TermId; 16]> = SmallVec::new();
        stack.push(term);
        while let Some(t) = stack.pop() {
            match self.resolve(t) {
                Term::True | Term::False => {}
                Term::Var(index) => {
                    if seen.insert(*index) {
                        vars.push(*index);
                    }
                }
                Term::Not(inner) => stack.push(*inner),
                Term::And(kids) | Term::Or(kids) => stack.extend(kids.iter().copied()),
            }
        }
        vars
    }

    /// Occurs check: does variable `var` occur free in `term`?
    pub fn occurs(&self, var: VarId, term: TermId) -> bool {
        let mut stack: SmallVec<[TermId; 16]> = SmallVec::new();
        stack.push(term);
        while let Some(t) = stack.pop() {
            match self.resolve(t) {
                Term::True | Term::False => {}
                Term::Var(index) => {
                    if *index == var {
                        return true;
                    }
                }
                Term::Not(inner) => stack.push(*inner),
                Term::And(kids) | Term::Or(kids) => stack.extend(kids.iter().copied()),
            }
        }
        false
    }

    /// Term size: leaf count plus connective count.
    pub fn size(&self, term: TermId) -> usize {
        let mut n = 0;
        let mut stack: SmallVec<[TermId; 16]> = SmallVec::new();
        stack.push(term);
        while let Some(t) = stack.pop() {
            n += 1;
            match self.resolve(t) {
                Term::True | Term::False | Term::Var(_) => {}
                Term::Not(inner) => stack.push(*inner),
                Term::And(kids) | Term::Or(kids) => stack.extend(kids.iter().copied()),
            }
        }
        n
    }

    /// Evaluate a term under a truth assignment of its variables.
    pub fn eval<F>(&self, term: TermId, assign: &F) -> bool
    where
        F: Fn(VarId) -> bool,
    {
        match self.resolve(term) {
            Term::True => true,
            Term::False => false,
            Term::Var(index) => assign(*index),
            Term::Not(inner) => !self.eval(*inner, assign),
            Term::And(kids) => kids.iter().all(|&k| self.eval(k, assign)),
            Term::Or(kids) => kids.iter().any(|&k| self.eval(k, assign)),
        }
    }
}

impl Default for TermStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a term for diagnostics: `T`, `F`, `$3`, `(not $0)`,
/// `(and $0 (or $1 $2))`.
pub fn format_term(term: TermId, terms: &TermStore) -> String {
    fn render(term: TermId, terms: &TermStore, out: &mut String) {
        match terms.resolve(term) {
            Term::True => out.push('T'),
            Term::False => out.push('F'),
            Term::Var(index) => {
                out.push('$');
                out.push_str(&index.to_string());
            }
            Term::Not(inner) => {
                out.push_str("(not ");
                render(*inner, terms, out);
                out.push(')');
            }
            Term::And(kids) => {
                out.push_str("(and");
                for kid in kids.iter() {
                    out.push(' ');
                    render(*kid, terms, out);
                }
                out.push(')');
            }
            Term::Or(kids) => {
                out.push_str("(or");
                for kid in kids.iter() {
                    out.push(' ');
                    render(*kid, terms, out);
                }
                out.push(')');
            }
        }
    }

    let mut out = String::new();
    render(term, terms, &mut out);
    out
}

#[cfg(test)]
#[path = "tests/term.rs"]
mod tests;
