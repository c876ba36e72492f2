use crate::equation::Equation;
use crate::term::{Term, TermId, TermStore, VarId};
use smallvec::SmallVec;

/// A substitution maps variable indices to terms.
/// Uses Vec<Option<TermId>> for dense local variables (0..n).
/// None means the variable is unbound (maps to itself).
///
/// Callers maintain the binding preconditions: keys are flexible ids,
/// and a bound value is canonical. Rebinding a key overwrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subst {
    bindings: Vec<Option<TermId>>,
}

impl Subst {
    /// Create an empty substitution.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Create a substitution with capacity for n variables.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            bindings: vec![None; n],
        }
    }

    /// Create a substitution with a single binding.
    pub fn singleton(var: VarId, term: TermId) -> Self {
        let mut subst = Self::new();
        subst.bind(var, term);
        subst
    }

    /// Bind a variable to a term. Extends the table if needed.
    pub fn bind(&mut self, var: VarId, term: TermId) {
        let idx = var as usize;
        if idx >= self.bindings.len() {
            self.bindings.resize(idx + 1, None);
        }
        self.bindings[idx] = Some(term);
    }

    /// Get the binding for a variable, if any.
    pub fn get(&self, var: VarId) -> Option<TermId> {
        self.bindings.get(var as usize).copied().flatten()
    }

    /// Check if a variable is bound.
    pub fn is_bound(&self, var: VarId) -> bool {
        self.get(var).is_some()
    }

    /// Check if the substitution is empty (no bindings).
    pub fn is_empty(&self) -> bool {
        self.bindings.iter().all(|b| b.is_none())
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.bindings.iter().filter(|b| b.is_some()).count()
    }

    /// Iterator over (var, term) pairs for bound variables.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, TermId)> + '_ {
        self.bindings
            .iter()
            .enumerate()
            .filter_map(|(i, opt)| opt.map(|tid| (i as VarId, tid)))
    }

    /// Apply the substitution to a term.
    ///
    /// A bound variable is replaced by its value in one step (values
    /// are not chased). Connectives are rebuilt through the smart
    /// constructors, so the result is canonical; unchanged subterms
    /// keep their ids.
    pub fn apply(&self, term: TermId, terms: &mut TermStore) -> TermId {
        if self.is_empty() {
            return term;
        }
        self.apply_inner(term, terms)
    }

    fn apply_inner(&self, term: TermId, terms: &mut TermStore) -> TermId {
        match terms.resolve(term).clone() {
            Term::True | Term::False => term,
            Term::Var(index) => self.get(index).unwrap_or(term),
            Term::Not(inner) => {
                let new_inner = self.apply_inner(inner, terms);
                if new_inner == inner {
                    term
                } else {
                    terms.mk_not(new_inner)
                }
            }
            Term::And(kids) => {
                let (new_kids, changed) = self.apply_kids(&kids, terms);
                if changed {
                    terms.mk_and(new_kids)
                } else {
                    term
                }
            }
            Term::Or(kids) => {
                let (new_kids, changed) = self.apply_kids(&kids, terms);
                if changed {
                    terms.mk_or(new_kids)
                } else {
                    term
                }
            }
        }
    }

    fn apply_kids(
        &self,
        kids: &[TermId],
        terms: &mut TermStore,
    ) -> (SmallVec<[TermId; 4]>, bool) {
        let mut new_kids: SmallVec<[TermId; 4]> = SmallVec::with_capacity(kids.len());
        let mut changed = false;
        for &kid in kids {
            let new_kid = self.apply_inner(kid, terms);
            changed |= new_kid != kid;
            new_kids.push(new_kid);
        }
        (new_kids, changed)
    }

    /// Apply to both sides of an equation and re-normalize orientation.
    pub fn apply_eq(&self, eq: &Equation, terms: &mut TermStore) -> Equation {
        let lhs = self.apply(eq.lhs, terms);
        let rhs = self.apply(eq.rhs, terms);
        Equation::mk(lhs, rhs, terms)
    }

    /// Apply to a list of equations.
    pub fn apply_eqs(&self, eqs: &[Equation], terms: &mut TermStore) -> Vec<Equation> {
        eqs.iter().map(|eq| self.apply_eq(eq, terms)).collect()
    }

    /// Left-biased composition: `self @@ other` applies `other` first.
    ///
    /// The result maps `x -> self(other[x])` for every `x` bound by
    /// `other`, plus every binding of `self` whose key `other` does not
    /// bind. Law: `(s1 @@ s2)(t) ≡ s1(s2(t))`.
    pub fn compose(&self, other: &Subst, terms: &mut TermStore) -> Subst {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        let mut out = Subst::with_capacity(self.bindings.len().max(other.bindings.len()));
        for (var, term) in other.iter() {
            out.bind(var, self.apply(term, terms));
        }
        for (var, term) in self.iter() {
            if !out.is_bound(var) {
                out.bind(var, term);
            }
        }
        out
    }

    /// Disjoint union: `self ++ other`.
    /// The domains must not overlap.
    pub fn merge_disjoint(&self, other: &Subst) -> Subst {
        let mut out = self.clone();
        for (var, term) in other.iter() {
            debug_assert!(!out.is_bound(var), "merge_disjoint: overlapping domains");
            out.bind(var, term);
        }
        out
    }
}

impl Default for Subst {
    fn default() -> Self {
        Self::new()
    }
}
