use super::*;
use crate::test_utils::{equiv, setup};

// ========== CONSTANTS AND VARIABLES ==========

#[test]
fn constants_are_pre_interned() {
    let terms = setup();
    assert_eq!(terms.resolve(terms.tru()), &Term::True);
    assert_eq!(terms.resolve(terms.fls()), &Term::False);
    assert_ne!(terms.tru(), terms.fls());
}

#[test]
fn vars_are_hashconsed() {
    let mut terms = setup();
    let a = terms.var(3);
    let b = terms.var(3);
    let c = terms.var(4);
    assert_eq!(a, b, "Same index should intern to the same id");
    assert_ne!(a, c);
}

#[test]
fn is_var_distinguishes_shapes() {
    let mut terms = setup();
    let v = terms.var(7);
    let n = terms.mk_not(v);
    assert_eq!(terms.is_var(v), Some(7));
    assert_eq!(terms.is_var(n), None);
    assert_eq!(terms.is_var(terms.tru()), None);
}

// ========== NEGATION ==========

#[test]
fn not_folds_constants() {
    let mut terms = setup();
    let t = terms.tru();
    let f = terms.fls();
    assert_eq!(terms.mk_not(t), f);
    assert_eq!(terms.mk_not(f), t);
}

#[test]
fn double_negation_cancels() {
    let mut terms = setup();
    let v = terms.var(0);
    let n = terms.mk_not(v);
    assert_eq!(terms.mk_not(n), v);
}

#[test]
fn negation_is_hashconsed() {
    let mut terms = setup();
    let v = terms.var(0);
    let n1 = terms.mk_not(v);
    let n2 = terms.mk_not(v);
    assert_eq!(n1, n2);
}

// ========== CONJUNCTION ==========

#[test]
fn and_false_annihilates() {
    let mut terms = setup();
    let v = terms.var(0);
    let f = terms.fls();
    assert_eq!(terms.mk_and2(v, f), f);
    assert_eq!(terms.mk_and2(f, v), f);
}

#[test]
fn and_true_drops() {
    let mut terms = setup();
    let v = terms.var(0);
    let t = terms.tru();
    assert_eq!(terms.mk_and2(v, t), v);
    assert_eq!(terms.mk_and2(t, v), v);
}

#[test]
fn and_empty_is_true() {
    let mut terms = setup();
    assert_eq!(terms.mk_and([]), terms.tru());
}

#[test]
fn and_singleton_is_child() {
    let mut terms = setup();
    let v = terms.var(0);
    assert_eq!(terms.mk_and([v]), v);
}

#[test]
fn and_flattens_nested() {
    let mut terms = setup();
    let a = terms.var(0);
    let b = terms.var(1);
    let c = terms.var(2);
    let inner = terms.mk_and2(a, b);
    let outer = terms.mk_and2(inner, c);
    match terms.resolve(outer) {
        Term::And(kids) => assert_eq!(kids.as_slice(), &[a, b, c]),
        other => panic!("expected flat And, got {other:?}"),
    }
}

#[test]
fn and_absorbs_duplicates() {
    let mut terms = setup();
    let a = terms.var(0);
    let b = terms.var(1);
    let left = terms.mk_and2(a, b);
    let right = terms.mk_and2(b, a);
    // (a ∧ b) ∧ (b ∧ a) flattens to [a, b, b, a] and dedups to [a, b]
    assert_eq!(terms.mk_and2(left, right), left);
}

#[test]
fn and_collapses_identical_vars() {
    let mut terms = setup();
    let a = terms.var(0);
    assert_eq!(terms.mk_and2(a, a), a);
}

// ========== DISJUNCTION ==========

#[test]
fn or_true_annihilates() {
    let mut terms = setup();
    let v = terms.var(0);
    let t = terms.tru();
    assert_eq!(terms.mk_or2(v, t), t);
    assert_eq!(terms.mk_or2(t, v), t);
}

#[test]
fn or_false_drops() {
    let mut terms = setup();
    let v = terms.var(0);
    let f = terms.fls();
    assert_eq!(terms.mk_or2(v, f), v);
    assert_eq!(terms.mk_or2(f, v), v);
}

#[test]
fn or_empty_is_false() {
    let mut terms = setup();
    assert_eq!(terms.mk_or([]), terms.fls());
}

#[test]
fn or_flattens_and_dedups() {
    let mut terms = setup();
    let a = terms.var(0);
    let b = terms.var(1);
    let inner = terms.mk_or2(a, b);
    let outer = terms.mk_or2(inner, a);
    assert_eq!(outer, inner);
}

// ========== XOR ==========

#[test]
fn xor_with_true_is_negation() {
    let mut terms = setup();
    let v = terms.var(0);
    let t = terms.tru();
    let not_v = terms.mk_not(v);
    assert_eq!(terms.mk_xor(v, t), not_v);
}

#[test]
fn xor_with_false_is_identity() {
    let mut terms = setup();
    let v = terms.var(0);
    let f = terms.fls();
    assert_eq!(terms.mk_xor(v, f), v);
}

#[test]
fn xor_of_constants() {
    let mut terms = setup();
    let t = terms.tru();
    let f = terms.fls();
    assert_eq!(terms.mk_xor(t, t), f);
    assert_eq!(terms.mk_xor(f, f), f);
    assert_eq!(terms.mk_xor(t, f), t);
}

#[test]
fn xor_of_same_var_is_unsatisfiable() {
    let mut terms = setup();
    let v = terms.var(0);
    let q = terms.mk_xor(v, v);
    let f = terms.fls();
    // Canonical form does not prove it, but the truth table does.
    assert!(equiv(q, f, &terms));
}

// ========== CANONICAL-FORM IDEMPOTENCE ==========

fn recanon(term: TermId, terms: &mut TermStore) -> TermId {
    match terms.resolve(term).clone() {
        Term::True => terms.tru(),
        Term::False => terms.fls(),
        Term::Var(x) => terms.var(x),
        Term::Not(inner) => {
            let inner = recanon(inner, terms);
            terms.mk_not(inner)
        }
        Term::And(kids) => {
            let kids: Vec<TermId> = kids.iter().map(|&k| recanon(k, terms)).collect();
            terms.mk_and(kids)
        }
        Term::Or(kids) => {
            let kids: Vec<TermId> = kids.iter().map(|&k| recanon(k, terms)).collect();
            terms.mk_or(kids)
        }
    }
}

#[test]
fn smart_constructors_are_idempotent() {
    let mut terms = setup();
    let a = terms.var(0);
    let b = terms.var(1);
    let c = terms.var(2);
    let not_b = terms.mk_not(b);
    let conj = terms.mk_and([a, not_b, c]);
    let disj = terms.mk_or2(conj, a);
    let q = terms.mk_xor(disj, c);

    for t in [a, not_b, conj, disj, q] {
        assert_eq!(recanon(t, &mut terms), t, "canonical form must be a fixed point");
    }
}

// ========== DERIVED OPERATIONS ==========

#[test]
fn free_vars_are_unique() {
    let mut terms = setup();
    let a = terms.var(2);
    let b = terms.var(0);
    let c = terms.var(1);
    let not_b = terms.mk_not(b);
    let conj = terms.mk_and([a, not_b, c, b]);
    // Walk order is an implementation detail; the set is not.
    let mut vars = terms.free_vars(conj);
    vars.sort_unstable();
    assert_eq!(vars, vec![0, 1, 2]);
}

#[test]
fn free_vars_of_ground_term_is_empty() {
    let mut terms = setup();
    let t = terms.tru();
    let f = terms.fls();
    let q = terms.mk_xor(t, f);
    assert!(terms.free_vars(q).is_empty());
}

#[test]
fn occurs_finds_nested_var() {
    let mut terms = setup();
    let a = terms.var(0);
    let b = terms.var(1);
    let not_a = terms.mk_not(a);
    let disj = terms.mk_or2(not_a, b);
    assert!(terms.occurs(0, disj));
    assert!(terms.occurs(1, disj));
    assert!(!terms.occurs(2, disj));
}

#[test]
fn size_counts_leaves_and_connectives() {
    let mut terms = setup();
    let a = terms.var(0);
    let b = terms.var(1);
    assert_eq!(terms.size(a), 1);
    let not_a = terms.mk_not(a);
    assert_eq!(terms.size(not_a), 2);
    let conj = terms.mk_and2(not_a, b);
    // and, not, $0, $1
    assert_eq!(terms.size(conj), 4);
}

#[test]
fn eval_respects_connectives() {
    let mut terms = setup();
    let a = terms.var(0);
    let b = terms.var(1);
    let not_b = terms.mk_not(b);
    let conj = terms.mk_and2(a, not_b);

    assert!(terms.eval(conj, &|x| x == 0));
    assert!(!terms.eval(conj, &|_| true));
    assert!(!terms.eval(conj, &|_| false));
}

#[test]
fn format_renders_sexpr() {
    let mut terms = setup();
    let a = terms.var(0);
    let b = terms.var(1);
    let not_b = terms.mk_not(b);
    let conj = terms.mk_and2(a, not_b);
    assert_eq!(format_term(conj, &terms), "(and $0 (not $1))");
    assert_eq!(format_term(terms.tru(), &terms), "T");
}
