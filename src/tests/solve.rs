use super::*;
use crate::term::TermId;
use crate::test_utils::{equiv, setup};

fn eq(lhs: TermId, rhs: TermId, terms: &TermStore) -> Equation {
    Equation::mk(lhs, rhs, terms)
}

fn solve(
    eqs: Vec<Equation>,
    rigid: &RigidSet,
    terms: &mut TermStore,
) -> Result<Subst, SolveError> {
    solve_system(eqs, rigid, &SolveLimits::default(), terms)
}

fn assert_unifies_all(subst: &Subst, eqs: &[Equation], terms: &mut TermStore) {
    for eq in eqs {
        let lhs = subst.apply(eq.lhs, terms);
        let rhs = subst.apply(eq.rhs, terms);
        assert!(
            equiv(lhs, rhs, terms),
            "substitution does not unify an input equation"
        );
    }
}

// ========== PIPELINE SCENARIOS ==========

#[test]
fn trivial_system_yields_empty_subst() {
    let mut terms = setup();
    let t = terms.tru();
    let subst = solve(vec![eq(t, t, &terms)], &RigidSet::new(), &mut terms).unwrap();
    assert!(subst.is_empty());
}

#[test]
fn empty_system_yields_empty_subst() {
    let mut terms = setup();
    let subst = solve(vec![], &RigidSet::new(), &mut terms).unwrap();
    assert!(subst.is_empty());
}

#[test]
fn unit_propagation_cascade() {
    let mut terms = setup();
    let x1 = terms.var(0);
    let x2 = terms.var(1);
    let x3 = terms.var(2);
    let t = terms.tru();
    let conj = terms.mk_and2(x1, x2);
    let eqs = vec![eq(x1, t, &terms), eq(x2, t, &terms), eq(x3, conj, &terms)];

    let subst = solve(eqs, &RigidSet::new(), &mut terms).unwrap();
    assert_eq!(subst.get(0), Some(t));
    assert_eq!(subst.get(1), Some(t));
    assert_eq!(subst.get(2), Some(t));
}

#[test]
fn variable_chain_resolves_to_constant() {
    let mut terms = setup();
    let x1 = terms.var(0);
    let x2 = terms.var(1);
    let x3 = terms.var(2);
    let t = terms.tru();
    let eqs = vec![eq(x1, x2, &terms), eq(x2, x3, &terms), eq(x3, t, &terms)];
    let input = eqs.clone();

    let subst = solve(eqs, &RigidSet::new(), &mut terms).unwrap();
    // The intermediate binding order may vary; all three must resolve
    // to ⊤ after application.
    for var in [x1, x2, x3] {
        assert_eq!(subst.apply(var, &mut terms), t);
    }
    assert_unifies_all(&subst, &input, &mut terms);
}

#[test]
fn trivial_assignment_binds_free_structure() {
    let mut terms = setup();
    let x1 = terms.var(0);
    let x2 = terms.var(1);
    let x3 = terms.var(2);
    let conj = terms.mk_and2(x2, x3);
    let eqs = vec![eq(x1, conj, &terms)];

    let subst = solve(eqs, &RigidSet::new(), &mut terms).unwrap();
    assert_eq!(subst.get(0), Some(conj));
    assert_eq!(subst.len(), 1);
}

#[test]
fn constant_clash_is_reported() {
    let mut terms = setup();
    let t = terms.tru();
    let f = terms.fls();
    let err = solve(vec![eq(t, f, &terms)], &RigidSet::new(), &mut terms).unwrap_err();
    assert_eq!(err, SolveError::Mismatch { lhs: t, rhs: f });
}

#[test]
fn sve_residue_is_solved() {
    let mut terms = setup();
    let x1 = terms.var(0);
    let x2 = terms.var(1);
    let disj = terms.mk_or2(x1, x2);
    let t = terms.tru();
    let input = vec![eq(disj, t, &terms)];

    let subst = solve(input.clone(), &RigidSet::new(), &mut terms).unwrap();
    assert_unifies_all(&subst, &input, &mut terms);
}

// ========== PHASE INTERACTION ==========

#[test]
fn phases_compose_in_order() {
    let mut terms = setup();
    let x = terms.var(0);
    let y = terms.var(1);
    let z = terms.var(2);
    let w = terms.var(3);
    let t = terms.tru();
    let not_w = terms.mk_not(w);
    // Unit propagation binds x, variable propagation aliases y to z,
    // trivial assignment binds z to ¬w.
    let eqs = vec![eq(x, t, &terms), eq(y, z, &terms), eq(z, not_w, &terms)];
    let input = eqs.clone();

    let subst = solve(eqs, &RigidSet::new(), &mut terms).unwrap();
    assert_eq!(subst.get(0), Some(t));
    // y's alias must be refined by the later binding of z.
    assert_eq!(subst.apply(y, &mut terms), not_w);
    assert_eq!(subst.apply(z, &mut terms), not_w);
    assert_unifies_all(&subst, &input, &mut terms);
}

#[test]
fn unit_bindings_feed_later_phases() {
    let mut terms = setup();
    let x = terms.var(0);
    let y = terms.var(1);
    let z = terms.var(2);
    let t = terms.tru();
    let conj = terms.mk_and2(x, y);
    // After x ↦ ⊤, the second equation becomes z ~ y and is handled
    // by variable propagation.
    let eqs = vec![eq(x, t, &terms), eq(z, conj, &terms)];
    let input = eqs.clone();

    let subst = solve(eqs, &RigidSet::new(), &mut terms).unwrap();
    assert_unifies_all(&subst, &input, &mut terms);
}

#[test]
fn mixed_system_with_sve_tail() {
    let mut terms = setup();
    let x = terms.var(0);
    let y = terms.var(1);
    let z = terms.var(2);
    let t = terms.tru();
    let disj = terms.mk_or2(y, z);
    let eqs = vec![eq(x, t, &terms), eq(disj, t, &terms)];
    let input = eqs.clone();

    let subst = solve(eqs, &RigidSet::new(), &mut terms).unwrap();
    assert_eq!(subst.get(0), Some(t));
    assert_unifies_all(&subst, &input, &mut terms);
}

// ========== RIGIDITY ==========

#[test]
fn rigid_var_never_enters_substitution() {
    let mut terms = setup();
    let x = terms.var(0);
    let r = terms.var(1);
    let disj = terms.mk_or2(x, r);
    let mut rigid = RigidSet::new();
    rigid.mark(1);
    let input = vec![eq(disj, r, &terms)];

    let subst = solve(input.clone(), &rigid, &mut terms).unwrap();
    assert!(!subst.is_bound(1));
    assert_unifies_all(&subst, &input, &mut terms);
}

#[test]
fn rigid_against_constant_conflicts() {
    let mut terms = setup();
    let r = terms.var(0);
    let t = terms.tru();
    let mut rigid = RigidSet::new();
    rigid.mark(0);

    let err = solve(vec![eq(r, t, &terms)], &rigid, &mut terms).unwrap_err();
    assert!(matches!(err, SolveError::Mismatch { .. }));
}

// ========== RETURNED SUBSTITUTION SHAPE ==========

#[test]
fn propagation_bindings_avoid_their_own_key() {
    let mut terms = setup();
    let x = terms.var(0);
    let y = terms.var(1);
    let z = terms.var(2);
    let t = terms.tru();
    let conj = terms.mk_and2(y, z);
    let eqs = vec![eq(x, conj, &terms), eq(y, t, &terms)];

    let subst = solve(eqs, &RigidSet::new(), &mut terms).unwrap();
    for (var, term) in subst.iter() {
        assert!(
            !terms.occurs(var, term),
            "propagation-produced binding must not mention its key"
        );
    }
}

#[test]
fn larger_mixed_system() {
    let mut terms = setup();
    let vars: Vec<TermId> = (0..8).map(|i| terms.var(i)).collect();
    let t = terms.tru();
    let conj01 = terms.mk_and2(vars[0], vars[1]);
    let disj67 = terms.mk_or2(vars[6], vars[7]);
    let not_5 = terms.mk_not(vars[5]);
    let eqs = vec![
        eq(conj01, t, &terms),
        eq(vars[2], vars[3], &terms),
        eq(vars[4], not_5, &terms),
        eq(disj67, t, &terms),
        eq(vars[3], vars[0], &terms),
    ];
    let input = eqs.clone();

    let subst = solve(eqs, &RigidSet::new(), &mut terms).unwrap();
    assert_unifies_all(&subst, &input, &mut terms);
}
