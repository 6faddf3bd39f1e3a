//! C5: SatGate — thin adapter over an external CDCL solver.
//!
//! Backed by `varisat::Solver`; see DESIGN.md for why this crate was
//! chosen and how the `nConfLimit` conflict-budget is approximated.

use varisat::{Lit as SatLit, Solver, Var as SatVar};

use crate::cnf::{estimate_clause_cost, CnfBuilder};
use crate::ir::aig::Lit;
use crate::ir::rebuilt::{RebuiltAig, RebuiltKind};

/// Outcome of a single equivalence query between two rebuilt-AIG literals.
#[derive(Debug)]
pub(crate) enum SolveStatus {
    /// The two literals were shown equivalent.
    Proved,
    /// A satisfying assignment distinguishes them; carries the model so
    /// the caller can extract a fresh simulation pattern.
    Disproved { model: Vec<SatLit> },
    /// The query's CNF footprint exceeded the conflict-budget proxy, or
    /// the underlying solver gave up; the node is left unmerged.
    Undecided,
}

enum QueryResult {
    Unsat,
    Sat(Vec<SatLit>),
    Undecided,
}

pub(crate) struct SatGate {
    solver: Solver<'static>,
}

impl SatGate {
    pub(crate) fn new() -> Self {
        Self { solver: Solver::new() }
    }

    /// Proves or disproves `a <-> b`. When either side is structurally the
    /// constant, the second (symmetric) query is skipped: a fixed truth
    /// value can never make the other direction satisfiable.
    pub(crate) fn solve_two(
        &mut self,
        graph: &mut RebuiltAig,
        a: Lit,
        b: Lit,
        conf_limit: u32,
    ) -> SolveStatus {
        let is_const = |lit: Lit| matches!(graph.kind(Lit::positive(lit.node())), RebuiltKind::Const0);
        let skip_second = is_const(a) || is_const(b);

        match self.query(graph, [a, b.negate()], conf_limit) {
            QueryResult::Sat(model) => return SolveStatus::Disproved { model },
            QueryResult::Undecided => return SolveStatus::Undecided,
            QueryResult::Unsat => {}
        }

        if skip_second {
            return SolveStatus::Proved;
        }

        match self.query(graph, [a.negate(), b], conf_limit) {
            QueryResult::Sat(model) => SolveStatus::Disproved { model },
            QueryResult::Undecided => SolveStatus::Undecided,
            QueryResult::Unsat => SolveStatus::Proved,
        }
    }

    fn query(&mut self, graph: &mut RebuiltAig, lits: [Lit; 2], conf_limit: u32) -> QueryResult {
        let cost = estimate_clause_cost(graph, lits[0]) + estimate_clause_cost(graph, lits[1]);
        if cost > conf_limit {
            return QueryResult::Undecided;
        }

        let sat_lits: Vec<SatLit> =
            lits.iter().map(|&l| CnfBuilder::get_cnf_lit(&mut self.solver, graph, l)).collect();
        self.solver.assume(&sat_lits);

        match self.solver.solve() {
            Ok(true) => QueryResult::Sat(self.solver.model().expect("SAT result without a model")),
            Ok(false) => QueryResult::Unsat,
            Err(_) => QueryResult::Undecided,
        }
    }
}

impl Default for SatGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads `lit`'s value out of a model returned by [`SolveStatus::Disproved`].
/// A literal the SAT cone never reached (no assigned SAT variable) reads as
/// `false`; its value doesn't matter since it wasn't a constraint on the
/// counter-example.
pub(crate) fn model_value(model: &[SatLit], graph: &RebuiltAig, lit: Lit) -> bool {
    let Some(var_idx) = graph.sat_var(Lit::positive(lit.node())) else {
        return false;
    };
    let var = SatVar::from_index(var_idx as usize);
    let raw = model.iter().find(|l| l.var() == var).map(|l| l.is_positive()).unwrap_or(false);
    raw ^ lit.is_complemented()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_literals_are_proved_equivalent() {
        let mut graph = RebuiltAig::new();
        let ci0 = graph.alloc_ci();
        let ci1 = graph.alloc_ci();
        let a = graph.hash_and(ci0, ci1);
        let b = graph.hash_and(ci1, ci0);

        let mut gate = SatGate::new();
        assert!(matches!(gate.solve_two(&mut graph, a, b, 1000), SolveStatus::Proved));
    }

    #[test]
    fn distinct_functions_are_disproved_with_a_model() {
        let mut graph = RebuiltAig::new();
        let ci0 = graph.alloc_ci();
        let ci1 = graph.alloc_ci();
        let a = graph.hash_and(ci0, ci1);
        let b = ci0; // ci0 != (ci0 & ci1) in general

        let mut gate = SatGate::new();
        match gate.solve_two(&mut graph, a, b, 1000) {
            SolveStatus::Disproved { model } => {
                assert!(!model.is_empty());
            }
            other => panic!("expected Disproved, got {other:?}"),
        }
    }

    #[test]
    fn zero_conflict_budget_forces_undecided_on_nontrivial_query() {
        let mut graph = RebuiltAig::new();
        let ci0 = graph.alloc_ci();
        let ci1 = graph.alloc_ci();
        let ci2 = graph.alloc_ci();
        let inner = graph.hash_and(ci0, ci1);
        let a = graph.hash_and(inner, ci2);
        let b = ci0;

        let mut gate = SatGate::new();
        assert!(matches!(gate.solve_two(&mut graph, a, b, 0), SolveStatus::Undecided));
    }
}
