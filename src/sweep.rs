//! C6: SweepLoop — the fixpoint orchestrator tying every other component
//! together.

use rand::rngs::ThreadRng;
use tracing::{debug, debug_span};

use crate::cex::Cex;
use crate::classes::ClassStore;
use crate::classify::Classifier;
use crate::errors::EngineError;
use crate::ir::aig::{Aig, Lit, NodeId, NodeKind};
use crate::ir::rebuilt::RebuiltAig;
use crate::params::EngineParams;
use crate::sat::{model_value, SatGate, SolveStatus};
use crate::sim::BitPackSim;

/// Heuristic bound (matching the ABC sources this design is grounded on)
/// on how many early iterations propagate the "skip this node's transitive
/// fanout" optimization after a disproof.
const TFO_SKIP_ITER_BOUND: u32 = 5;

/// Running statistics accumulated across the whole sweep.
#[derive(Debug, Default, Clone)]
pub struct SweepReport {
    pub iterations: u32,
    pub proved: u32,
    pub disproved: u32,
    pub failed: u32,
    pub sat_calls: u32,
}

/// Result of a full sweep: either every node reached a fixpoint, or (in
/// miter mode) a primary output was shown satisfiable and a counter-example
/// was extracted.
#[derive(Debug)]
pub enum SweepOutcome {
    Equivalent(SweepReport),
    Distinguished { report: SweepReport, cex: Cex },
}

/// Runs SAT sweeping to a fixpoint (or until a miter output is disproved).
pub(crate) fn sweep(aig: &mut Aig, params: &EngineParams) -> Result<SweepOutcome, EngineError> {
    let num_nodes = aig.num_nodes();
    let mut sim = BitPackSim::new(num_nodes, params.n_sim_words);
    let mut store = ClassStore::with_const0_head(num_nodes);
    let mut graph = RebuiltAig::new();
    let mut gate = SatGate::new();
    let mut rng = ThreadRng::default();
    let mut report = SweepReport::default();

    aig.node_mut(Aig::const0_id()).value = Some(Lit::const0());
    let ci_list: Vec<NodeId> = aig.cis().to_vec();
    let ci_rebuilt: Vec<Lit> = ci_list.iter().map(|_| graph.alloc_ci()).collect();
    for (&ci, &rlit) in ci_list.iter().zip(&ci_rebuilt) {
        aig.node_mut(ci).value = Some(rlit);
    }

    // A Co whose driver is already 1 under the all-zero pattern is a
    // distinguishing counter-example with no simulation needed at all.
    if params.is_miter {
        for &co in aig.cos() {
            if aig[co].phase {
                let cex = crate::cex::extract(aig, &sim, co, 0);
                return Ok(SweepOutcome::Distinguished { report, cex });
            }
        }
    }

    sim.randomize_cis(aig, &mut rng);
    sim.propagate_ands(aig);
    if let Some(cex) = check_miter_cos(aig, &mut sim, params, &mut report, 0) {
        return Ok(SweepOutcome::Distinguished { report, cex });
    }
    Classifier::build_initial(&mut store, &sim, aig);

    // Extra simulation/refinement rounds to let classes settle before
    // paying for any SAT calls.
    for _ in 0..params.n_sim_rounds {
        sim.randomize_cis(aig, &mut rng);
        sim.propagate_ands(aig);
        if let Some(cex) = check_miter_cos(aig, &mut sim, params, &mut report, 0) {
            return Ok(SweepOutcome::Distinguished { report, cex });
        }
        Classifier::refine_all(&mut store, &sim, aig);
    }

    for round in 1.. {
        let span = debug_span!("sweep_iteration", round);
        let _enter = span.enter();

        sim.randomize_cis(aig, &mut rng);
        sim.propagate_ands(aig);
        if let Some(cex) = check_miter_cos(aig, &mut sim, params, &mut report, round) {
            return Ok(SweepOutcome::Distinguished { report, cex });
        }
        Classifier::refine_all(&mut store, &sim, aig);

        let disproved_before = report.disproved;

        let order: Vec<NodeId> = aig.topo_order().collect();
        for node in order {
            let (fanin0, fanin1) = match aig[node].kind {
                NodeKind::And { fanin0, fanin1 } => (fanin0, fanin1),
                _ => continue,
            };

            if aig[fanin0.node()].mark1 || aig[fanin1.node()].mark1 {
                aig.node_mut(node).mark1 = true;
            }
            if aig[node].mark1 || aig[node].value.is_some() {
                continue;
            }
            let (Some(v0), Some(v1)) = (aig[fanin0.node()].value, aig[fanin1.node()].value) else {
                continue;
            };

            let a0 = v0.maybe_negate(fanin0.is_complemented());
            let a1 = v1.maybe_negate(fanin1.is_complemented());
            let p_new = graph.hash_and(a0, a1);
            aig.node_mut(node).value = Some(p_new);

            let Some(repr) = store.get_repr(node) else { continue };
            if aig[repr].mark1 {
                continue;
            }
            let Some(r_value) = aig[repr].value else { continue };

            if p_new.node() == r_value.node() {
                aig.node_mut(node).proved = true;
                aig.node_mut(node).repr = Some(repr);
                report.proved += 1;
                continue;
            }

            let relative_negate = aig[node].phase ^ aig[repr].phase;
            let expected = r_value.maybe_negate(relative_negate);

            report.sat_calls += 1;
            match gate.solve_two(&mut graph, p_new, expected, params.n_conf_limit) {
                SolveStatus::Proved => {
                    aig.node_mut(node).value = Some(expected);
                    aig.node_mut(node).proved = true;
                    aig.node_mut(node).repr = Some(repr);
                    report.proved += 1;
                }
                SolveStatus::Disproved { model } => {
                    report.disproved += 1;
                    let col = sim.alloc_pattern_column();
                    for (&ci_node, &rl) in ci_list.iter().zip(&ci_rebuilt) {
                        let bit = model_value(&model, &graph, rl);
                        sim.set_input_bit(ci_node, col, bit);
                    }
                    aig.node_mut(node).value = None;
                    if round <= TFO_SKIP_ITER_BOUND {
                        aig.node_mut(node).mark1 = true;
                        if matches!(aig[repr].kind, NodeKind::And { .. }) {
                            aig.node_mut(repr).mark1 = true;
                        }
                    }
                }
                SolveStatus::Undecided => {
                    aig.node_mut(node).failed = true;
                    report.failed += 1;
                }
            }
        }

        debug!(
            round,
            proved = report.proved,
            disproved = report.disproved,
            failed = report.failed,
            "sweep iteration finished"
        );

        report.iterations = round;
        if report.disproved == disproved_before {
            break;
        }
    }

    Ok(SweepOutcome::Equivalent(report))
}

/// Checks every Co's current simulation for a nonzero word; if found,
/// records the iteration count and extracts a counter-example.
fn check_miter_cos(
    aig: &Aig,
    sim: &mut BitPackSim,
    params: &EngineParams,
    report: &mut SweepReport,
    round: u32,
) -> Option<Cex> {
    if !params.is_miter {
        return None;
    }
    sim.eval_cos(aig);
    for &co in aig.cos() {
        if let Some(col) = sim.first_one_bit(co) {
            report.iterations = round;
            return Some(crate::cex::extract(aig, sim, co, col));
        }
    }
    None
}
