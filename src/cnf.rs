//! C4: CnfBuilder — on-demand CNF encoding of the rebuilt, structurally
//! hashed AIG, with MUX/ITE recognition and multi-input AND super-gates.
//!
//! Generic over `varisat::ExtendFormula` so the same encoding logic can
//! target a live `Solver` (SatGate's normal path) or a standalone
//! `CnfFormula` (used by tests to assert exact clause counts).

use varisat::{ExtendFormula, Lit as SatLit, Var as SatVar};

use crate::ir::aig::Lit;
use crate::ir::rebuilt::{RebuiltAig, RebuiltKind};

pub(crate) struct CnfBuilder;

/// Recovers the `(selector, then, else)` literals of a MUX node from its
/// two AND fanins (shared by `build_mux` and the read-only cost estimator).
fn decode_mux(graph: &RebuiltAig, fanin0: Lit, fanin1: Lit) -> (Lit, Lit, Lit) {
    let (s_then, t) = match graph.kind(fanin0) {
        RebuiltKind::And { fanin0, fanin1 } => (fanin0, fanin1),
        _ => unreachable!("mark0 set on a non-AND-of-ANDs node"),
    };
    let (s_else, e) = match graph.kind(fanin1) {
        RebuiltKind::And { fanin0, fanin1 } => (fanin0, fanin1),
        _ => unreachable!("mark0 set on a non-AND-of-ANDs node"),
    };

    if s_then == s_else.negate() {
        (s_then, t, e)
    } else if t == s_else.negate() {
        (t, s_then, e)
    } else if s_then == e.negate() {
        (s_then, t, s_else)
    } else {
        (t, s_then, s_else)
    }
}

/// Estimates the number of CNF clauses building `lit` would add, without
/// mutating the graph or allocating SAT variables. Used by SatGate to
/// enforce the conflict-budget proxy before committing to a query.
pub(crate) fn estimate_clause_cost(graph: &RebuiltAig, lit: Lit) -> u32 {
    let node = Lit::positive(lit.node());
    if graph.sat_var(node).is_some() {
        return 0;
    }
    match graph.kind(node) {
        RebuiltKind::Const0 => 1,
        RebuiltKind::Ci => 0,
        RebuiltKind::And { fanin0, fanin1 } => {
            if graph.mark0(node) {
                let (selector, then_sig, else_sig) = decode_mux(graph, fanin0, fanin1);
                6 + estimate_clause_cost(graph, selector)
                    + estimate_clause_cost(graph, then_sig)
                    + estimate_clause_cost(graph, else_sig)
            } else {
                let mut leaves = Vec::new();
                CnfBuilder::collect_super_gate_leaves(graph, node, &mut leaves);
                leaves.len() as u32 + 1 + leaves.iter().map(|l| estimate_clause_cost(graph, *l)).sum::<u32>()
            }
        }
    }
}

impl CnfBuilder {
    /// Returns the signed SAT literal for `lit`, building and emitting any
    /// CNF this requires for not-yet-variablized rebuilt-AIG nodes.
    pub(crate) fn get_cnf_lit(
        formula: &mut impl ExtendFormula,
        graph: &mut RebuiltAig,
        lit: Lit,
    ) -> SatLit {
        let root = Lit::positive(lit.node());
        let var = Self::get_or_build_var(formula, graph, root);
        if lit.is_complemented() { var.negative() } else { var.positive() }
    }

    fn get_or_build_var(
        formula: &mut impl ExtendFormula,
        graph: &mut RebuiltAig,
        node: Lit,
    ) -> SatVar {
        if let Some(v) = graph.sat_var(node) {
            return SatVar::from_index(v as usize);
        }

        let var = match graph.kind(node) {
            RebuiltKind::Const0 => {
                let v = formula.new_var();
                formula.add_clause(&[v.negative()]);
                v
            }
            RebuiltKind::Ci => formula.new_var(),
            RebuiltKind::And { fanin0, fanin1 } => {
                if graph.mark0(node) {
                    Self::build_mux(formula, graph, fanin0, fanin1)
                } else {
                    Self::build_super_gate(formula, graph, node)
                }
            }
        };

        graph.set_sat_var(node, Some(var.index() as u32));
        var
    }

    /// Six-clause ITE encoding. `fanin0`/`fanin1` are the two ANDs whose
    /// conjunction forms `NOT(ite(selector, then, else))` (see
    /// `RebuiltAig::hash_and`'s MUX recognition and DESIGN.md).
    fn build_mux(
        formula: &mut impl ExtendFormula,
        graph: &mut RebuiltAig,
        fanin0: Lit,
        fanin1: Lit,
    ) -> SatVar {
        let (selector, then_sig, else_sig) = decode_mux(graph, fanin0, fanin1);

        let i = Self::get_cnf_lit(formula, graph, selector);
        let then_lit = Self::get_cnf_lit(formula, graph, then_sig);
        let else_lit = Self::get_cnf_lit(formula, graph, else_sig);

        let m = formula.new_var();
        // node = fanin0 & fanin1 = NOT(ite(i, then, else)), so the ite's own
        // positive value is the negation of this node's variable.
        let f = m.negative();

        formula.add_clause(&[!i, !then_lit, f]);
        formula.add_clause(&[!i, then_lit, !f]);
        formula.add_clause(&[i, !else_lit, f]);
        formula.add_clause(&[i, else_lit, !f]);
        if then_lit.var() != else_lit.var() {
            formula.add_clause(&[then_lit, else_lit, !f]);
            formula.add_clause(&[!then_lit, !else_lit, f]);
        }

        m
    }

    /// Transparent multi-input AND encoding: collects every leaf reachable
    /// through uncomplemented, non-MUX, not-yet-shared AND fanins, then
    /// emits `k` binary implications plus one `(k+1)`-literal clause.
    fn build_super_gate(formula: &mut impl ExtendFormula, graph: &mut RebuiltAig, root: Lit) -> SatVar {
        let mut leaves = Vec::new();
        Self::collect_super_gate_leaves(graph, root, &mut leaves);

        let n_var = formula.new_var();
        let n_lit = n_var.positive();

        let mut big_clause = Vec::with_capacity(leaves.len() + 1);
        big_clause.push(n_lit);
        for leaf in leaves {
            let leaf_lit = Self::get_cnf_lit(formula, graph, leaf);
            formula.add_clause(&[!n_lit, leaf_lit]);
            big_clause.push(!leaf_lit);
        }
        formula.add_clause(&big_clause);

        n_var
    }

    /// Leaves excludes: complemented fanins, non-AND fanins (CIs/Const0),
    /// MUX nodes, and nodes already variablized elsewhere (a conservative
    /// proxy for the original's reuse-count check, since this crate does
    /// not track fanout counts on the rebuilt AIG).
    fn collect_super_gate_leaves(graph: &RebuiltAig, root: Lit, leaves: &mut Vec<Lit>) {
        let RebuiltKind::And { fanin0, fanin1 } = graph.kind(root) else {
            unreachable!("super-gate root must be an AND node")
        };
        for fanin in [fanin0, fanin1] {
            let is_leaf = fanin.is_complemented()
                || !matches!(graph.kind(fanin), RebuiltKind::And { .. })
                || graph.mark0(fanin)
                || graph.sat_var(fanin).is_some();

            if is_leaf {
                leaves.push(fanin);
            } else {
                Self::collect_super_gate_leaves(graph, fanin, leaves);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use varisat::{CnfFormula, Solver};

    #[test]
    fn ci_gets_a_fresh_variable() {
        let mut graph = RebuiltAig::new();
        let ci = graph.alloc_ci();
        let mut formula = CnfFormula::new();
        let lit = CnfBuilder::get_cnf_lit(&mut formula, &mut graph, ci);
        assert!(lit.is_positive());
    }

    #[test]
    fn and_gate_is_satisfiable_only_when_both_inputs_true() {
        let mut graph = RebuiltAig::new();
        let ci0 = graph.alloc_ci();
        let ci1 = graph.alloc_ci();
        let and = graph.hash_and(ci0, ci1);

        let mut formula = CnfFormula::new();
        let and_lit = CnfBuilder::get_cnf_lit(&mut formula, &mut graph, and);
        let ci0_lit = CnfBuilder::get_cnf_lit(&mut formula, &mut graph, ci0);
        let ci1_lit = CnfBuilder::get_cnf_lit(&mut formula, &mut graph, ci1);

        let mut solver = Solver::new();
        solver.add_formula(&formula);
        solver.assume(&[and_lit]);
        assert!(solver.solve().unwrap());
        let model = solver.model().unwrap();
        assert!(model.contains(&ci0_lit));
        assert!(model.contains(&ci1_lit));
    }

    #[test]
    fn mux_node_emits_exactly_six_clauses() {
        let mut graph = RebuiltAig::new();
        let s = graph.alloc_ci();
        let t = graph.alloc_ci();
        let e = graph.alloc_ci();
        let left = graph.hash_and(s, t);
        let right = graph.hash_and(s.negate(), e);
        let mux = graph.hash_and(left.negate(), right.negate());
        assert!(graph.mark0(mux));

        let mut formula = CnfFormula::new();
        let before = formula.len();
        let _ = CnfBuilder::get_cnf_lit(&mut formula, &mut graph, mux);
        // s, t, e are plain CI variables (no clauses); the MUX itself emits
        // exactly the six ITE clauses since then/else use distinct variables.
        assert_eq!(formula.len() - before, 6);
    }

    #[test]
    fn super_gate_emits_k_plus_one_clauses() {
        let mut graph = RebuiltAig::new();
        let ci0 = graph.alloc_ci();
        let ci1 = graph.alloc_ci();
        let ci2 = graph.alloc_ci();
        // A transparent 3-input AND: (ci0 & ci1) & ci2, none shared elsewhere.
        let inner = graph.hash_and(ci0, ci1);
        let outer = graph.hash_and(inner, ci2);
        assert!(!graph.mark0(outer));

        let mut formula = CnfFormula::new();
        let before = formula.len();
        let _ = CnfBuilder::get_cnf_lit(&mut formula, &mut graph, outer);
        // 3 leaves -> 3 binary implications + 1 big clause = 4.
        assert_eq!(formula.len() - before, 4);
    }
}
