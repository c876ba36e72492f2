//! Successive Variable Elimination over the residual system.
//!
//! Every equation that survives the propagation phases is turned into
//! a validity query `q = lhs ⊕ rhs` (valid iff `q ≡ ⊥`) and solved by
//! eliminating its flexible variables one at a time. The staged
//! pipeline keeps the residue small, so the doubly-exponential worst
//! case of the algorithm stays theoretical; a budget turns runaway
//! queries into an error instead of a hung compiler.

use rustc_hash::FxHashMap;

use crate::equation::Equation;
use crate::error::SolveError;
use crate::rigid::RigidSet;
use crate::subst::Subst;
use crate::term::{TermId, TermStore, VarId};
use crate::trace::trace;

/// Budget for the elimination core.
///
/// `max_sve_vars` bounds how many flexible variables one query may
/// eliminate; `max_sat_vars` bounds the brute-force satisfiability
/// check at the base of the recursion (cost `2^k`, and clamped to 63
/// since the enumeration mask is a u64); `max_query_size` bounds the
/// canonical size of any intermediate query. Exceeding any of them
/// surfaces as `TooComplex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveLimits {
    pub max_sve_vars: usize,
    pub max_sat_vars: usize,
    pub max_query_size: usize,
}

impl Default for SolveLimits {
    fn default() -> Self {
        Self {
            max_sve_vars: 32,
            max_sat_vars: 20,
            max_query_size: 100_000,
        }
    }
}

/// Why one query could not be solved.
enum SveFailure {
    /// The base query is satisfiable: no substitution can make the
    /// sides equal.
    Unsolvable,
    /// The budget was exceeded.
    TooLarge,
}

/// Solve the residual equations one at a time, in input order.
///
/// Each solved equation's substitution is applied to the remainder
/// before the next is attempted, and the results are composed so the
/// earliest substitution applies first.
pub fn sve_all(
    eqs: Vec<Equation>,
    rigid: &RigidSet,
    limits: &SolveLimits,
    terms: &mut TermStore,
) -> Result<Subst, SolveError> {
    let mut total = Subst::new();
    let mut rest = eqs;
    while !rest.is_empty() {
        let eq = rest.remove(0);
        let subst = sve_equation(&eq, rigid, limits, terms)?;
        if !subst.is_empty() {
            rest = subst.apply_eqs(&rest, terms);
        }
        total = subst.compose(&total, terms);
    }
    Ok(total)
}

/// Solve a single equation by variable elimination.
fn sve_equation(
    eq: &Equation,
    rigid: &RigidSet,
    limits: &SolveLimits,
    terms: &mut TermStore,
) -> Result<Subst, SolveError> {
    let query = terms.mk_xor(eq.lhs, eq.rhs);
    let mut flex: Vec<VarId> = terms
        .free_vars(query)
        .into_iter()
        .filter(|&x| !rigid.is_rigid(x))
        .collect();
    flex.sort_unstable();

    trace!(
        vars = flex.len(),
        size = terms.size(query),
        "sve_equation"
    );

    if flex.len() > limits.max_sve_vars || terms.size(query) > limits.max_query_size {
        return Err(SolveError::TooComplex {
            lhs: eq.lhs,
            rhs: eq.rhs,
        });
    }
    match sve(query, &flex, limits, terms) {
        Ok(subst) => Ok(subst),
        Err(SveFailure::Unsolvable) => Err(SolveError::Mismatch {
            lhs: eq.lhs,
            rhs: eq.rhs,
        }),
        Err(SveFailure::TooLarge) => Err(SolveError::TooComplex {
            lhs: eq.lhs,
            rhs: eq.rhs,
        }),
    }
}

/// Eliminate `vars` from `query`, producing a substitution that makes
/// the query `⊥`, or fail.
///
/// For `x :: rest`, the branches `t0 = q[x ↦ ⊥]` and `t1 = q[x ↦ ⊤]`
/// must both vanish; `t0 ∧ t1` is the condition on the remaining
/// variables. The binding for `x` is the general solution
/// `σ(t0) ∨ (x ∧ ¬σ(t1))`, with `x` itself as the free parameter.
fn sve(
    query: TermId,
    vars: &[VarId],
    limits: &SolveLimits,
    terms: &mut TermStore,
) -> Result<Subst, SveFailure> {
    let Some((&x, rest)) = vars.split_first() else {
        // Remaining variables are all rigid; the query is valid only
        // if no assignment of them satisfies it.
        return if satisfiable(query, limits, terms)? {
            Err(SveFailure::Unsolvable)
        } else {
            Ok(Subst::new())
        };
    };

    let fls = terms.fls();
    let tru = terms.tru();
    let t0 = Subst::singleton(x, fls).apply(query, terms);
    let t1 = Subst::singleton(x, tru).apply(query, terms);
    let next = terms.mk_and2(t0, t1);
    if terms.size(next) > limits.max_query_size {
        return Err(SveFailure::TooLarge);
    }

    let rest_subst = sve(next, rest, limits, terms)?;

    let t0_solved = rest_subst.apply(t0, terms);
    let t1_solved = rest_subst.apply(t1, terms);
    let var_x = terms.var(x);
    let not_t1 = terms.mk_not(t1_solved);
    let guard = terms.mk_and2(var_x, not_t1);
    let value = terms.mk_or2(t0_solved, guard);

    Ok(Subst::singleton(x, value).merge_disjoint(&rest_subst))
}

/// Brute-force satisfiability of a query whose free variables are all
/// treated as flexible. Short-circuits on the first model.
fn satisfiable(
    query: TermId,
    limits: &SolveLimits,
    terms: &TermStore,
) -> Result<bool, SveFailure> {
    if query == terms.tru() {
        return Ok(true);
    }
    if query == terms.fls() {
        return Ok(false);
    }
    let vars = terms.free_vars(query);
    // The enumeration mask is a u64, so the effective budget can never
    // exceed 63 bits no matter what the caller configured.
    if vars.len() > limits.max_sat_vars.min(63) {
        return Err(SveFailure::TooLarge);
    }
    let bit_of: FxHashMap<VarId, usize> = vars
        .iter()
        .enumerate()
        .map(|(bit, &var)| (var, bit))
        .collect();
    for mask in 0u64..(1u64 << vars.len()) {
        if terms.eval(query, &|x| (mask >> bit_of[&x]) & 1 == 1) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
#[path = "tests/sve.rs"]
mod tests;
