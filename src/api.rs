//! Public API for effuni - Boolean unification for effect types.
//!
//! The entry point is [`unify_all`]: given a sequence of effect
//! equations and a rigidity environment, it produces a most-general
//! substitution making every equation valid, or reports why none
//! exists. Interned variable ids, the term store, and every other
//! piece of working state are local to one call, so concurrent solves
//! on different threads never interact.

use rustc_hash::FxHashMap;

use crate::effect::{Effect, EffectSubst, Rigidity, RigidityEnv};
use crate::equation::Equation;
use crate::error::{SolveError, UnifyError};
use crate::rigid::RigidSet;
use crate::solve::solve_system;
use crate::subst::Subst;
use crate::sve::SolveLimits;
use crate::symbol::EffVar;
use crate::term::{Term, TermId, TermStore, VarId};
use crate::trace::{debug, debug_span};

/// Unify a system of effect equations under the default solver budget.
pub fn unify_all(
    pairs: &[(Effect, Effect)],
    rigidity: &RigidityEnv,
) -> Result<EffectSubst, UnifyError> {
    unify_all_with_limits(pairs, rigidity, &SolveLimits::default())
}

/// Unify a system of effect equations with an explicit solver budget.
pub fn unify_all_with_limits(
    pairs: &[(Effect, Effect)],
    rigidity: &RigidityEnv,
    limits: &SolveLimits,
) -> Result<EffectSubst, UnifyError> {
    if pairs.is_empty() {
        return Ok(EffectSubst::new());
    }

    let _span = debug_span!("unify_all", pairs = pairs.len()).entered();

    // Assign a dense id to each variable in order of first appearance.
    let mut vars: Vec<EffVar> = Vec::new();
    let mut ids: FxHashMap<EffVar, VarId> = FxHashMap::default();
    for (lhs, rhs) in pairs {
        for var in lhs.vars().into_iter().chain(rhs.vars()) {
            ids.entry(var).or_insert_with(|| {
                vars.push(var);
                vars.len() as VarId - 1
            });
        }
    }

    let mut rigid = RigidSet::new();
    for (id, var) in vars.iter().enumerate() {
        if rigidity.get(*var) == Rigidity::Rigid {
            rigid.mark(id as VarId);
        }
    }
    debug!(vars = vars.len(), rigid = rigid.len(), "interned");

    let mut terms = TermStore::new();
    let eqs: Vec<Equation> = pairs
        .iter()
        .map(|(lhs, rhs)| {
            let lhs = to_term(lhs, &ids, &mut terms);
            let rhs = to_term(rhs, &ids, &mut terms);
            Equation::mk(lhs, rhs, &terms)
        })
        .collect();

    match solve_system(eqs, &rigid, limits, &mut terms) {
        Ok(subst) => Ok(to_effect_subst(&subst, &vars, &terms)),
        Err(SolveError::Mismatch { lhs, rhs }) => Err(UnifyError::MismatchedEffects(
            to_effect(lhs, &vars, &terms),
            to_effect(rhs, &vars, &terms),
        )),
        Err(SolveError::TooComplex { lhs, rhs }) => Err(UnifyError::TooComplex(
            to_effect(lhs, &vars, &terms),
            to_effect(rhs, &vars, &terms),
        )),
    }
}

/// Translate a caller effect into an interned canonical term.
///
/// The effect lattice is dual to the Boolean one (Pure is the identity
/// of union), so union maps to conjunction and intersection to
/// disjunction.
fn to_term(effect: &Effect, ids: &FxHashMap<EffVar, VarId>, terms: &mut TermStore) -> TermId {
    match effect {
        Effect::Pure => terms.tru(),
        Effect::Univ => terms.fls(),
        Effect::Var(var) => {
            let id = ids[var];
            terms.var(id)
        }
        Effect::Complement(inner) => {
            let inner = to_term(inner, ids, terms);
            terms.mk_not(inner)
        }
        Effect::Union(lhs, rhs) => {
            let lhs = to_term(lhs, ids, terms);
            let rhs = to_term(rhs, ids, terms);
            terms.mk_and2(lhs, rhs)
        }
        Effect::Intersection(lhs, rhs) => {
            let lhs = to_term(lhs, ids, terms);
            let rhs = to_term(rhs, ids, terms);
            terms.mk_or2(lhs, rhs)
        }
    }
}

/// Translate an interned term back into a caller effect.
fn to_effect(term: TermId, vars: &[EffVar], terms: &TermStore) -> Effect {
    match terms.resolve(term) {
        Term::True => Effect::Pure,
        Term::False => Effect::Univ,
        Term::Var(id) => Effect::Var(vars[*id as usize]),
        Term::Not(inner) => Effect::complement(to_effect(*inner, vars, terms)),
        Term::And(kids) => {
            let mut acc = to_effect(kids[0], vars, terms);
            for &kid in &kids[1..] {
                acc = Effect::union(acc, to_effect(kid, vars, terms));
            }
            acc
        }
        Term::Or(kids) => {
            let mut acc = to_effect(kids[0], vars, terms);
            for &kid in &kids[1..] {
                acc = Effect::intersection(acc, to_effect(kid, vars, terms));
            }
            acc
        }
    }
}

fn to_effect_subst(subst: &Subst, vars: &[EffVar], terms: &TermStore) -> EffectSubst {
    let mut out = EffectSubst::new();
    for (id, term) in subst.iter() {
        out.bind(vars[id as usize], to_effect(term, vars, terms));
    }
    out
}
