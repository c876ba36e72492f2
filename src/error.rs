use thiserror::Error;

use crate::effect::Effect;
use crate::term::TermId;

/// Failure of a whole unification problem, in caller vocabulary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnifyError {
    /// The system has no unifier; the two effects witness the
    /// conflict.
    #[error("mismatched effects: `{0}` is incompatible with `{1}`")]
    MismatchedEffects(Effect, Effect),
    /// The constraint exceeded the solver's complexity budget.
    #[error("effect constraint `{0} ~ {1}` is too complex to solve")]
    TooComplex(Effect, Effect),
}

/// Internal solver failure over interned terms.
///
/// Phases raise these eagerly; the driver converts to [`UnifyError`]
/// exactly once, mapping the witnesses back through the interning
/// bijection. Unification is deterministic, so nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    Mismatch { lhs: TermId, rhs: TermId },
    TooComplex { lhs: TermId, rhs: TermId },
}
