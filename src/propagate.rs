//! The cheap rewrite phases that run before variable elimination.
//!
//! Effect constraint systems emitted by type inference are dominated by
//! trivial equations (`x ~ ⊤`, `x ~ y`, `x ~ t` with `x` fresh in `t`).
//! These phases discharge that majority with linear pattern matching so
//! only a small residue reaches the elimination core.

use smallvec::SmallVec;

use crate::equation::Equation;
use crate::error::SolveError;
use crate::rigid::RigidSet;
use crate::subst::Subst;
use crate::term::{Term, TermId, TermStore, VarId};

/// What unit propagation decided for one equation in one pass.
enum UnitStep {
    /// Not a unit pattern (or blocked by a rigid id); keep it.
    Keep,
    /// Discharged; extend the pass substitution with these bindings.
    Discharge(SmallVec<[(VarId, TermId); 4]>),
}

/// Phase 1: unit propagation, iterated to fixpoint.
///
/// Each pass discharges `x ~ ⊤`, `x ~ ⊥`, all-variable conjunctions
/// equated to `⊤`, and all-variable disjunctions equated to `⊥`. The
/// pass bindings are then applied to the kept equations, which can
/// expose new unit patterns; the loop stops on a pass with no new
/// bindings.
pub fn unit_propagate(
    eqs: Vec<Equation>,
    rigid: &RigidSet,
    terms: &mut TermStore,
) -> (Vec<Equation>, Subst) {
    let mut total = Subst::new();
    let mut current = eqs;
    loop {
        let mut pass = Subst::new();
        let mut kept: Vec<Equation> = Vec::with_capacity(current.len());
        for eq in &current {
            match unit_step(eq, rigid, &pass, terms) {
                UnitStep::Keep => kept.push(*eq),
                UnitStep::Discharge(binds) => {
                    for (var, term) in binds {
                        pass.bind(var, term);
                    }
                }
            }
        }
        if pass.is_empty() {
            return (kept, total);
        }
        current = pass.apply_eqs(&kept, terms);
        total = pass.compose(&total, terms);
    }
}

fn unit_step(eq: &Equation, rigid: &RigidSet, pass: &Subst, terms: &TermStore) -> UnitStep {
    let tru = terms.tru();
    let fls = terms.fls();
    match terms.resolve(eq.lhs) {
        Term::Var(x) if eq.rhs == tru || eq.rhs == fls => {
            if rigid.is_rigid(*x) {
                return UnitStep::Keep;
            }
            match pass.get(*x) {
                // Bound to the same constant earlier in this pass.
                Some(prev) if prev == eq.rhs => UnitStep::Discharge(SmallVec::new()),
                // Bound to the other constant; applying the pass will
                // turn this into a constant clash for the conflict
                // check.
                Some(_) => UnitStep::Keep,
                None => {
                    let mut binds = SmallVec::new();
                    binds.push((*x, eq.rhs));
                    UnitStep::Discharge(binds)
                }
            }
        }
        // x1 ∧ … ∧ xn = ⊤  ⇔  ∀i. xi = ⊤
        Term::And(kids) => {
            if eq.rhs == tru {
                vars_to_const(kids, tru, rigid, pass, terms)
            } else {
                UnitStep::Keep
            }
        }
        // x1 ∨ … ∨ xn = ⊥  ⇔  ∀i. xi = ⊥
        Term::Or(kids) => {
            if eq.rhs == fls {
                vars_to_const(kids, fls, rigid, pass, terms)
            } else {
                UnitStep::Keep
            }
        }
        _ => UnitStep::Keep,
    }
}

/// Bind every child variable to `value`, provided all children are
/// flexible variables. A non-variable or rigid child keeps the whole
/// equation.
fn vars_to_const(
    kids: &[TermId],
    value: TermId,
    rigid: &RigidSet,
    pass: &Subst,
    terms: &TermStore,
) -> UnitStep {
    let mut binds: SmallVec<[(VarId, TermId); 4]> = SmallVec::new();
    for &kid in kids {
        let Some(x) = terms.is_var(kid) else {
            return UnitStep::Keep;
        };
        if rigid.is_rigid(x) {
            return UnitStep::Keep;
        }
        match pass.get(x) {
            Some(prev) if prev == value => {}
            Some(_) => return UnitStep::Keep,
            None => binds.push((x, value)),
        }
    }
    UnitStep::Discharge(binds)
}

/// Discard trivial equations and detect outright conflicts.
///
/// Runs after every propagation phase. Identical sides are dropped
/// (canonical terms make this an id comparison). A constant clash, a
/// rigid variable equated to a constant, or two distinct rigid
/// variables equated are unsolvable.
pub fn simplify(
    eqs: Vec<Equation>,
    rigid: &RigidSet,
    terms: &TermStore,
) -> Result<Vec<Equation>, SolveError> {
    let mut out = Vec::with_capacity(eqs.len());
    for eq in eqs {
        if eq.lhs == eq.rhs {
            continue;
        }
        let conflict = match (terms.resolve(eq.lhs), terms.resolve(eq.rhs)) {
            (Term::True, Term::False) | (Term::False, Term::True) => true,
            (Term::Var(x), Term::True | Term::False) => rigid.is_rigid(*x),
            (Term::Var(x), Term::Var(y)) => rigid.is_rigid(*x) && rigid.is_rigid(*y),
            _ => false,
        };
        if conflict {
            return Err(SolveError::Mismatch {
                lhs: eq.lhs,
                rhs: eq.rhs,
            });
        }
        out.push(eq);
    }
    Ok(out)
}

/// Phase 2: variable propagation.
///
/// A single pass binding `x ↦ y` for every `x ~ y` with `x` flexible
/// (or `y ↦ x` when only `y` is). Earlier bindings are applied before
/// matching, so a later `y ~ x` collapses instead of producing a
/// cyclic pair. Two distinct rigid variables equated are unsolvable.
pub fn var_propagate(
    eqs: Vec<Equation>,
    rigid: &RigidSet,
    terms: &mut TermStore,
) -> Result<(Vec<Equation>, Subst), SolveError> {
    let mut subst = Subst::new();
    let mut kept: Vec<Equation> = Vec::with_capacity(eqs.len());
    for eq in &eqs {
        let eq = subst.apply_eq(eq, terms);
        if eq.lhs == eq.rhs {
            continue;
        }
        match (terms.resolve(eq.lhs), terms.resolve(eq.rhs)) {
            (Term::Var(x), Term::Var(y)) => {
                if !rigid.is_rigid(*x) {
                    subst.bind(*x, eq.rhs);
                } else if !rigid.is_rigid(*y) {
                    subst.bind(*y, eq.lhs);
                } else {
                    return Err(SolveError::Mismatch {
                        lhs: eq.lhs,
                        rhs: eq.rhs,
                    });
                }
            }
            _ => kept.push(eq),
        }
    }
    let kept = subst.apply_eqs(&kept, terms);
    Ok((kept, subst))
}

/// Phase 3: trivial assignment.
///
/// A single pass binding `x ↦ t` for every `x ~ t` with `x` flexible
/// and `x` not free in `t`. The running substitution is applied to
/// each equation before matching, so later equations see earlier
/// bindings.
pub fn trivial_assign(
    eqs: Vec<Equation>,
    rigid: &RigidSet,
    terms: &mut TermStore,
) -> (Vec<Equation>, Subst) {
    let mut subst = Subst::new();
    let mut kept: Vec<Equation> = Vec::with_capacity(eqs.len());
    for eq in &eqs {
        let eq = subst.apply_eq(eq, terms);
        if eq.lhs == eq.rhs {
            continue;
        }
        if let Some(x) = terms.is_var(eq.lhs) {
            if !rigid.is_rigid(x) && !terms.occurs(x, eq.rhs) {
                subst.bind(x, eq.rhs);
                continue;
            }
        }
        kept.push(eq);
    }
    let kept = subst.apply_eqs(&kept, terms);
    (kept, subst)
}

#[cfg(test)]
#[path = "tests/propagate.rs"]
mod tests;
