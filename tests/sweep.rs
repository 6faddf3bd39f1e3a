use aigsweep::{Aig, EngineParams, Lit, SweepOutcome};

#[test]
fn two_identical_inverters_are_proved_equivalent() {
    let mut aig = Aig::new();
    let ci0 = aig.add_ci();
    let _a = aig.add_and(Lit::new(ci0, true), Lit::new(ci0, true));
    let _b = aig.add_and(Lit::new(ci0, true), Lit::new(ci0, true));

    let outcome = aigsweep::sweep(&mut aig, &EngineParams::default()).unwrap();
    assert!(matches!(outcome, SweepOutcome::Equivalent(_)));
}

#[test]
fn miter_of_equal_circuits_is_equivalent() {
    let mut aig = Aig::new();
    let ci0 = aig.add_ci();
    let ci1 = aig.add_ci();
    let left = aig.add_and(Lit::positive(ci0), Lit::positive(ci1));
    let right = aig.add_and(Lit::positive(ci1), Lit::positive(ci0));
    let not_both = aig.add_and(Lit::new(left, true), Lit::new(right, true));
    let not_neither = aig.add_and(Lit::positive(left), Lit::positive(right));
    let xor = aig.add_and(Lit::new(not_both, true), Lit::new(not_neither, true));
    aig.add_co(Lit::positive(xor));

    let params = EngineParams { is_miter: true, ..EngineParams::default() };
    let outcome = aigsweep::sweep(&mut aig, &params).unwrap();
    assert!(matches!(outcome, SweepOutcome::Equivalent(_)));
}

#[test]
fn miter_with_one_bit_discrepancy_is_distinguished() {
    let mut aig = Aig::new();
    let ci0 = aig.add_ci();
    let ci1 = aig.add_ci();
    // left = ci0 & ci1, right = ci0 (differs whenever ci1 is 0 and ci0 is 1).
    let left = aig.add_and(Lit::positive(ci0), Lit::positive(ci1));
    let right = ci0;
    let not_both = aig.add_and(Lit::new(left, true), Lit::new(right, true));
    let not_neither = aig.add_and(Lit::positive(left), Lit::positive(right));
    let xor = aig.add_and(Lit::new(not_both, true), Lit::new(not_neither, true));
    aig.add_co(Lit::positive(xor));

    let params = EngineParams { is_miter: true, ..EngineParams::default() };
    let outcome = aigsweep::sweep(&mut aig, &params).unwrap();
    match outcome {
        SweepOutcome::Distinguished { cex, .. } => {
            assert_eq!(cex.ci_values.len(), 2);
            // ci1 = false, ci0 = true distinguishes left from right.
            assert!(!cex.ci_values[1]);
            assert!(cex.ci_values[0]);
        }
        other => panic!("expected Distinguished, got {other:?}"),
    }
}

#[test]
fn constant_zero_node_merges_with_const0() {
    let mut aig = Aig::new();
    let ci0 = aig.add_ci();
    let always_zero = aig.add_and(Lit::positive(ci0), Lit::new(ci0, true));

    let outcome = aigsweep::sweep(&mut aig, &EngineParams::default()).unwrap();
    assert!(matches!(outcome, SweepOutcome::Equivalent(_)));
    assert!(aig.proved(always_zero));
    assert_eq!(aig.repr(always_zero), Some(Aig::const0_id()));
}

#[test]
fn mux_shaped_circuit_sweeps_to_equivalence() {
    let mut aig = Aig::new();
    let s = aig.add_ci();
    let t = aig.add_ci();
    let e = aig.add_ci();
    // ite(s, t, e) built two different but equivalent ways.
    let left1 = aig.add_and(Lit::positive(s), Lit::positive(t));
    let right1 = aig.add_and(Lit::new(s, true), Lit::positive(e));
    let ite_a = aig.add_and(Lit::new(left1, true), Lit::new(right1, true));

    let left2 = aig.add_and(Lit::positive(t), Lit::positive(s));
    let right2 = aig.add_and(Lit::positive(e), Lit::new(s, true));
    let ite_b = aig.add_and(Lit::new(left2, true), Lit::new(right2, true));

    let not_both = aig.add_and(Lit::new(ite_a, true), Lit::new(ite_b, true));
    let not_neither = aig.add_and(Lit::positive(ite_a), Lit::positive(ite_b));
    let xor = aig.add_and(Lit::new(not_both, true), Lit::new(not_neither, true));
    aig.add_co(Lit::positive(xor));

    let params = EngineParams { is_miter: true, ..EngineParams::default() };
    let outcome = aigsweep::sweep(&mut aig, &params).unwrap();
    assert!(matches!(outcome, SweepOutcome::Equivalent(_)));
}

#[test]
fn zero_conflict_budget_leaves_nontrivial_pairs_undecided_but_reports_success() {
    let mut aig = Aig::new();
    let ci0 = aig.add_ci();
    let ci1 = aig.add_ci();
    let ci2 = aig.add_ci();
    let inner_a = aig.add_and(Lit::positive(ci1), Lit::positive(ci2));
    let inner_b = aig.add_and(Lit::positive(ci1), Lit::positive(ci2));
    let left = aig.add_and(Lit::positive(ci0), Lit::positive(inner_a));
    let right = aig.add_and(Lit::positive(inner_b), Lit::positive(ci0));
    let _ = (left, right);

    let params = EngineParams { n_conf_limit: 0, ..EngineParams::default() };
    // A budget of zero forces every non-trivial SAT query to come back
    // Undecided; the sweep still terminates (no further disproofs to chase)
    // rather than looping forever or erroring out.
    let outcome = aigsweep::sweep(&mut aig, &params).unwrap();
    assert!(matches!(outcome, SweepOutcome::Equivalent(_)));
}
