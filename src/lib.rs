//! SAT-sweeping equivalence engine for combinational AND-inverter graphs.
//!
//! Build an [`Aig`] from primary inputs, AND gates, and (for miter mode)
//! primary outputs, then call [`sweep`] to merge every pair of nodes random
//! simulation and incremental SAT prove equivalent.

mod cex;
mod classes;
mod classify;
mod cnf;
mod errors;
mod ir;
mod params;
mod sat;
mod sim;
mod sweep;

pub use cex::Cex;
pub use errors::EngineError;
pub use ir::aig::{Aig, Lit, NodeId};
pub use params::EngineParams;
pub use sweep::{SweepOutcome, SweepReport};

/// Runs the sweep to a fixpoint.
///
/// In miter mode (`params.is_miter`), returns as soon as any primary output
/// is shown satisfiable, carrying a [`Cex`] that distinguishes the two
/// sides of the miter. Otherwise runs until an iteration merges no further
/// nodes, at which point every node's candidate-equivalence class has been
/// either proved, structurally merged, or left marked as failed (SAT gave
/// up under the conflict budget).
pub fn sweep(aig: &mut Aig, params: &EngineParams) -> Result<SweepOutcome, EngineError> {
    let params = params.clone().validate()?;
    sweep::sweep(aig, &params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_sweeps_two_identical_inverters() {
        let mut aig = Aig::new();
        let ci0 = aig.add_ci();
        let a = aig.add_and(Lit::new(ci0, true), Lit::new(ci0, true));
        let b = aig.add_and(Lit::new(ci0, true), Lit::new(ci0, true));

        let params = EngineParams::default();
        let outcome = sweep(&mut aig, &params).unwrap();
        assert!(matches!(outcome, SweepOutcome::Equivalent(_)));
        let _ = (a, b);
    }

    #[test]
    fn rejects_invalid_params() {
        let mut aig = Aig::new();
        let params = EngineParams { n_sim_words: 0, ..EngineParams::default() };
        assert!(matches!(sweep(&mut aig, &params), Err(EngineError::ConfigInvalid(_))));
    }
}
