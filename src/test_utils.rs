use crate::term::{TermId, TermStore, VarId};

pub(crate) fn setup() -> TermStore {
    TermStore::new()
}

/// Truth-table equivalence over the union of both terms' free
/// variables. Only usable for the small var counts unit tests work
/// with.
pub(crate) fn equiv(a: TermId, b: TermId, terms: &TermStore) -> bool {
    let mut vars = terms.free_vars(a);
    for var in terms.free_vars(b) {
        if !vars.contains(&var) {
            vars.push(var);
        }
    }
    assert!(vars.len() <= 16, "too many variables for a truth table");
    for mask in 0u32..(1u32 << vars.len()) {
        let assign = |x: VarId| {
            vars.iter()
                .position(|&v| v == x)
                .map(|i| (mask >> i) & 1 == 1)
                .unwrap_or(false)
        };
        if terms.eval(a, &assign) != terms.eval(b, &assign) {
            return false;
        }
    }
    true
}
