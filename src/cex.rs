//! C7: CexBuilder — counter-example extraction once a miter output's
//! simulation shows a satisfying pattern.

use crate::ir::aig::{Aig, NodeId};
use crate::sim::BitPackSim;

/// A concrete input assignment distinguishing the two sides of a miter,
/// found by simulation rather than requiring a further SAT call: the
/// disproof that produced this pattern already proved the output can be 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cex {
    /// Index of the distinguishing output within [`Aig::cos`]'s order.
    pub output_index: usize,
    /// One bit per CI, in [`Aig::cis`]'s order.
    pub ci_values: Vec<bool>,
}

pub(crate) fn extract(aig: &Aig, sim: &BitPackSim, co: NodeId, col: usize) -> Cex {
    let output_index =
        aig.cos().iter().position(|&n| n == co).expect("co must be one of aig.cos()");
    let ci_values = aig.cis().iter().map(|&ci| sim.bit_at(ci, col)).collect();
    Cex { output_index, ci_values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::aig::Lit;

    #[test]
    fn extract_reads_the_distinguishing_pattern() {
        let mut aig = Aig::new();
        let ci0 = aig.add_ci();
        let ci1 = aig.add_ci();
        let and = aig.add_and(Lit::positive(ci0), Lit::positive(ci1));
        let co = aig.add_co(Lit::positive(and));

        let mut sim = BitPackSim::new(aig.num_nodes(), 1);
        sim.set_input_bit(ci0, 3, true);
        sim.set_input_bit(ci1, 3, true);
        sim.propagate_ands(&aig);
        sim.eval_cos(&aig);

        let col = sim.first_one_bit(co).expect("output should be satisfiable at column 3");
        let cex = extract(&aig, &sim, co, col);
        assert_eq!(cex.output_index, 0);
        assert_eq!(cex.ci_values, vec![true, true]);
    }
}
