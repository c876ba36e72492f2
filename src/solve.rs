//! The staged pipeline over interned equations.
//!
//! Phases run in strict sequence: unit propagation, variable
//! propagation, trivial assignment, then variable elimination on the
//! residue. A simplify/conflict pass runs between phases so trivial
//! equations never reach a later stage and conflicts surface as early
//! as possible.

use crate::equation::Equation;
use crate::error::SolveError;
use crate::propagate::{simplify, trivial_assign, unit_propagate, var_propagate};
use crate::rigid::RigidSet;
use crate::subst::Subst;
use crate::sve::{sve_all, SolveLimits};
use crate::term::TermStore;
use crate::trace::{debug, debug_span};

/// Solve a system of equations over interned variable ids.
///
/// Returns the composed substitution of all phases: the unit
/// propagation bindings apply first, the elimination bindings last.
pub fn solve_system(
    eqs: Vec<Equation>,
    rigid: &RigidSet,
    limits: &SolveLimits,
    terms: &mut TermStore,
) -> Result<Subst, SolveError> {
    let _span = debug_span!("solve_system", eqs = eqs.len()).entered();

    let (eqs, units) = unit_propagate(eqs, rigid, terms);
    debug!(
        bound = units.len(),
        remaining = eqs.len(),
        "unit_propagation_done"
    );
    let eqs = simplify(eqs, rigid, terms)?;

    let (eqs, aliases) = var_propagate(eqs, rigid, terms)?;
    debug!(
        bound = aliases.len(),
        remaining = eqs.len(),
        "variable_propagation_done"
    );
    let eqs = simplify(eqs, rigid, terms)?;

    let (eqs, assigns) = trivial_assign(eqs, rigid, terms);
    debug!(
        bound = assigns.len(),
        remaining = eqs.len(),
        "trivial_assignment_done"
    );
    let eqs = simplify(eqs, rigid, terms)?;

    let eliminated = sve_all(eqs, rigid, limits, terms)?;
    debug!(bound = eliminated.len(), "elimination_done");

    let subst = aliases.compose(&units, terms);
    let subst = assigns.compose(&subst, terms);
    Ok(eliminated.compose(&subst, terms))
}

#[cfg(test)]
#[path = "tests/solve.rs"]
mod tests;
